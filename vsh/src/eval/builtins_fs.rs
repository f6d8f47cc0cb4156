use super::Outcome;
use crate::error::VshResult;
use crate::path;
use crate::shell::Shell;

impl Shell {
    pub(crate) async fn try_execute_fs_builtin(
        &mut self,
        name: &str,
        args: &[String],
    ) -> Option<VshResult<Outcome>> {
        match name {
            "ls" | "cd" | "pwd" | "mkdir" | "rmdir" | "rm" | "touch" | "cp" | "mv" => {
                Some(self.dispatch_fs_builtin(name, args).await)
            }
            _ => None,
        }
    }

    async fn dispatch_fs_builtin(&mut self, name: &str, args: &[String]) -> VshResult<Outcome> {
        match name {
            "pwd" => Ok(Outcome::Text(self.cwd.clone())),
            "cd" => Ok(self.cmd_cd(args)),
            "ls" => self.cmd_ls(args).await,
            "mkdir" => self.cmd_mkdir(args).await,
            "rmdir" => self.cmd_rmdir(args).await,
            "rm" => self.cmd_rm(args).await,
            "touch" => self.cmd_touch(args).await,
            "cp" => self.cmd_cp(args).await,
            "mv" => self.cmd_mv(args).await,
            _ => unreachable!(),
        }
    }

    fn cmd_cd(&mut self, args: &[String]) -> Outcome {
        self.cwd = path::change_dir(&self.cwd, args.first().map(String::as_str));
        tracing::debug!(cwd = %self.cwd, "changed directory");
        self.terminal
            .write_line(&format!("Current directory: {}", self.cwd));
        Outcome::empty()
    }

    async fn cmd_ls(&self, args: &[String]) -> VshResult<Outcome> {
        let dir = self.resolve_path(args.first());
        let names = self.fs.list_files(&dir).await?;
        Ok(Outcome::Text(names.join("\n")))
    }

    async fn cmd_mkdir(&self, args: &[String]) -> VshResult<Outcome> {
        let dir = self.resolve_path(args.first());
        self.fs.create_directory(&dir).await?;
        Ok(Outcome::Text(format!("Directory created: {dir}")))
    }

    async fn cmd_rmdir(&self, args: &[String]) -> VshResult<Outcome> {
        let dir = self.resolve_path(args.first());
        self.fs.delete_directory(&dir).await?;
        Ok(Outcome::Text(format!("Directory removed: {dir}")))
    }

    async fn cmd_rm(&self, args: &[String]) -> VshResult<Outcome> {
        let file = self.resolve_path(args.first());
        self.fs.delete_file(&file).await?;
        Ok(Outcome::Text(format!("File removed: {file}")))
    }

    async fn cmd_touch(&self, args: &[String]) -> VshResult<Outcome> {
        let file = self.resolve_path(args.first());
        self.fs.create_file(&file, "").await?;
        Ok(Outcome::Text(format!("File created: {file}")))
    }

    async fn cmd_cp(&self, args: &[String]) -> VshResult<Outcome> {
        let src = self.resolve_path(args.first());
        let dst = self.resolve_path(args.get(1));
        let content = self.fs.read_file(&src).await?;
        self.fs.write_file(&dst, &content).await?;
        Ok(Outcome::Text(format!("Copied from {src} to {dst}")))
    }

    async fn cmd_mv(&self, args: &[String]) -> VshResult<Outcome> {
        let src = self.resolve_path(args.first());
        let dst = self.resolve_path(args.get(1));
        let content = self.fs.read_file(&src).await?;
        self.fs.write_file(&dst, &content).await?;
        self.fs.delete_file(&src).await?;
        Ok(Outcome::Text(format!("Moved from {src} to {dst}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::VshError;
    use crate::eval::Outcome;
    use crate::shell::{Shell, ShellBuilder};
    use crate::terminal::BufferedTerminal;
    use std::sync::Arc;
    use vos_core::MemoryFs;
    use vos_sdk::{FileSystem, FsError};

    fn setup() -> (Shell, Arc<MemoryFs>) {
        let (shell, fs, _) = setup_with_terminal();
        (shell, fs)
    }

    fn setup_with_terminal() -> (Shell, Arc<MemoryFs>, Arc<BufferedTerminal>) {
        let fs = Arc::new(MemoryFs::new());
        let terminal = Arc::new(BufferedTerminal::new());
        let shell = ShellBuilder::new(fs.clone(), terminal.clone()).build();
        (shell, fs, terminal)
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    async fn run(shell: &mut Shell, name: &str, list: &[&str]) -> Outcome {
        shell.execute(name, &args(list), "").await.unwrap()
    }

    #[tokio::test]
    async fn test_cd_and_pwd() {
        let (mut shell, _) = setup();
        assert_eq!(run(&mut shell, "pwd", &[]).await, Outcome::text("/"));

        assert_eq!(run(&mut shell, "cd", &["a/b/"]).await, Outcome::empty());
        assert_eq!(shell.cwd, "/a/b");

        run(&mut shell, "cd", &["../../../x"]).await;
        assert_eq!(run(&mut shell, "pwd", &[]).await, Outcome::text("/x"));

        run(&mut shell, "cd", &[]).await;
        assert_eq!(shell.cwd, "/x");
    }

    #[tokio::test]
    async fn test_cd_reports_new_directory() {
        let (mut shell, _, terminal) = setup_with_terminal();
        run(&mut shell, "cd", &["/a/./b"]).await;
        run(&mut shell, "cd", &[".."]).await;
        assert_eq!(
            terminal.lines(),
            vec!["Current directory: /a/b", "Current directory: /a"]
        );
    }

    #[tokio::test]
    async fn test_touch_then_cat_is_empty() {
        let (mut shell, _) = setup();
        run(&mut shell, "touch", &["/f.txt"]).await;
        assert_eq!(run(&mut shell, "cat", &["/f.txt"]).await, Outcome::empty());

        run(&mut shell, "touch", &["/g.txt"]).await;
        shell.process_line("echo abc > /g.txt").await.unwrap();
        assert_eq!(run(&mut shell, "cat", &["/g.txt"]).await, Outcome::text("abc"));
    }

    #[tokio::test]
    async fn test_parent_segments_reach_backend_unresolved() {
        let (mut shell, fs) = setup();
        fs.write_file("/x", "top").await.unwrap();
        fs.create_directory("/home").await.unwrap();
        shell.cwd = "/home".to_string();

        let err = shell.execute("cat", &args(&["../x"]), "").await.unwrap_err();
        assert!(matches!(err, VshError::Fs(FsError::NotFound(_))));

        run(&mut shell, "cd", &[".."]).await;
        assert_eq!(run(&mut shell, "cat", &["x"]).await, Outcome::text("top"));
    }

    #[tokio::test]
    async fn test_mkdir_then_ls() {
        let (mut shell, _) = setup();
        assert_eq!(
            run(&mut shell, "mkdir", &["/home"]).await,
            Outcome::text("Directory created: /home")
        );
        run(&mut shell, "touch", &["/b.txt"]).await;
        run(&mut shell, "touch", &["/a.txt"]).await;

        assert_eq!(run(&mut shell, "ls", &[]).await, Outcome::text("a.txt\nb.txt\nhome"));
        assert_eq!(run(&mut shell, "ls", &["/home"]).await, Outcome::empty());
    }

    #[tokio::test]
    async fn test_relative_paths_are_not_normalized() {
        let (mut shell, fs) = setup();
        assert_eq!(
            run(&mut shell, "touch", &["notes.txt"]).await,
            Outcome::text("File created: //notes.txt")
        );
        assert!(fs.exists("/notes.txt").await);
    }

    #[tokio::test]
    async fn test_touch_existing_file_fails() {
        let (mut shell, _) = setup();
        run(&mut shell, "touch", &["/f.txt"]).await;
        let err = shell.execute("touch", &args(&["/f.txt"]), "").await.unwrap_err();
        assert!(matches!(err, VshError::Fs(FsError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_rm_and_rmdir() {
        let (mut shell, fs) = setup();
        fs.create_directory("/d").await.unwrap();
        fs.write_file("/d/f", "x").await.unwrap();

        let err = shell.execute("rmdir", &args(&["/d"]), "").await.unwrap_err();
        assert!(matches!(err, VshError::Fs(FsError::DirectoryNotEmpty(_))));

        assert_eq!(run(&mut shell, "rm", &["/d/f"]).await, Outcome::text("File removed: /d/f"));
        assert_eq!(
            run(&mut shell, "rmdir", &["/d"]).await,
            Outcome::text("Directory removed: /d")
        );
        assert!(!fs.exists("/d").await);
    }

    #[tokio::test]
    async fn test_cp_keeps_source() {
        let (mut shell, fs) = setup();
        fs.write_file("/src.txt", "payload").await.unwrap();

        assert_eq!(
            run(&mut shell, "cp", &["/src.txt", "/dst.txt"]).await,
            Outcome::text("Copied from /src.txt to /dst.txt")
        );
        assert_eq!(fs.read_file("/src.txt").await.unwrap(), "payload");
        assert_eq!(fs.read_file("/dst.txt").await.unwrap(), "payload");
    }

    #[tokio::test]
    async fn test_mv_removes_source() {
        let (mut shell, fs) = setup();
        fs.write_file("/src.txt", "payload").await.unwrap();

        assert_eq!(
            run(&mut shell, "mv", &["/src.txt", "/moved.txt"]).await,
            Outcome::text("Moved from /src.txt to /moved.txt")
        );
        assert!(!fs.exists("/src.txt").await);
        assert_eq!(fs.read_file("/moved.txt").await.unwrap(), "payload");
    }

    #[tokio::test]
    async fn test_cp_missing_source_writes_nothing() {
        let (mut shell, fs) = setup();
        assert!(shell.execute("cp", &args(&["/none", "/dst"]), "").await.is_err());
        assert!(!fs.exists("/dst").await);
    }
}
