use super::Outcome;
use crate::error::VshResult;
use crate::shell::Shell;

impl Shell {
    pub(crate) async fn try_execute_text_builtin(
        &mut self,
        name: &str,
        args: &[String],
        piped: &str,
    ) -> Option<VshResult<Outcome>> {
        match name {
            "echo" => Some(Ok(self.cmd_echo(args))),
            "grep" => Some(Ok(self.cmd_grep(args, piped))),
            "cat" => Some(self.cmd_cat(args).await),
            _ => None,
        }
    }

    fn cmd_echo(&self, args: &[String]) -> Outcome {
        Outcome::Text(args.join(" "))
    }

    fn cmd_grep(&self, args: &[String], piped: &str) -> Outcome {
        if piped.is_empty() {
            self.terminal.write_error("No input provided to grep");
            return Outcome::empty();
        }

        let pattern = args.first().map(String::as_str).unwrap_or("");
        let matched: Vec<&str> = piped
            .split('\n')
            .filter(|line| line.contains(pattern))
            .collect();
        Outcome::Text(matched.join("\n"))
    }

    async fn cmd_cat(&self, args: &[String]) -> VshResult<Outcome> {
        let path = self.resolve_path(args.first());
        let content = self.fs.read_file(&path).await?;
        Ok(Outcome::Text(content))
    }
}

#[cfg(test)]
mod tests {
    use crate::eval::Outcome;
    use crate::shell::{Shell, ShellBuilder};
    use crate::terminal::BufferedTerminal;
    use std::sync::Arc;
    use vos_core::MemoryFs;
    use vos_sdk::FileSystem;

    fn setup() -> (Shell, Arc<MemoryFs>, Arc<BufferedTerminal>) {
        let fs = Arc::new(MemoryFs::new());
        let terminal = Arc::new(BufferedTerminal::new());
        let shell = ShellBuilder::new(fs.clone(), terminal.clone()).build();
        (shell, fs, terminal)
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_echo_joins_with_single_spaces() {
        let (mut shell, _, _) = setup();
        let out = shell.execute("echo", &args(&["a", "b", "c"]), "").await.unwrap();
        assert_eq!(out, Outcome::text("a b c"));

        let out = shell.execute("echo", &[], "").await.unwrap();
        assert_eq!(out, Outcome::empty());
    }

    #[tokio::test]
    async fn test_grep_filters_lines() {
        let (mut shell, _, _) = setup();
        let piped = "error: disk\ninfo: ok\nerror: net";
        let out = shell.execute("grep", &args(&["error"]), piped).await.unwrap();
        assert_eq!(out, Outcome::text("error: disk\nerror: net"));
    }

    #[tokio::test]
    async fn test_grep_without_input() {
        let (mut shell, _, terminal) = setup();
        let out = shell.execute("grep", &args(&["x"]), "").await.unwrap();
        assert_eq!(out, Outcome::empty());
        assert_eq!(terminal.errors(), vec!["No input provided to grep"]);
    }

    #[tokio::test]
    async fn test_grep_without_pattern_keeps_everything() {
        let (mut shell, _, _) = setup();
        let out = shell.execute("grep", &[], "a\nb").await.unwrap();
        assert_eq!(out, Outcome::text("a\nb"));
    }

    #[tokio::test]
    async fn test_cat_reads_relative_to_cwd() {
        let (mut shell, fs, _) = setup();
        fs.write_file("/docs/readme.txt", "hello").await.unwrap();
        shell.cwd = "/docs".to_string();

        let out = shell.execute("cat", &args(&["readme.txt"]), "").await.unwrap();
        assert_eq!(out, Outcome::text("hello"));
    }

    #[tokio::test]
    async fn test_cat_missing_file_fails() {
        let (mut shell, _, _) = setup();
        assert!(shell.execute("cat", &args(&["/nope"]), "").await.is_err());
    }
}
