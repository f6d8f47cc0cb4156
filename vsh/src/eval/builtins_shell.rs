use super::{unknown_command, Outcome};
use crate::error::VshResult;
use crate::help;
use crate::shell::Shell;

impl Shell {
    pub(crate) async fn try_execute_shell_builtin(
        &mut self,
        name: &str,
        args: &[String],
    ) -> Option<VshResult<Outcome>> {
        match name {
            "help" => Some(Ok(self.cmd_help(args))),
            "exit" => Some(Ok(self.cmd_exit())),
            "clear" => Some(self.cmd_clear().await),
            _ => None,
        }
    }

    fn cmd_help(&self, args: &[String]) -> Outcome {
        match args.first() {
            Some(cmd_name) => match help::get_help(cmd_name) {
                Some(cmd_help) if self.is_enabled(cmd_name) => {
                    Outcome::Text(help::format_help(cmd_help))
                }
                _ => Outcome::Text(unknown_command(cmd_name)),
            },
            None => Outcome::Text(help::format_help_list(
                help::command_names().filter(|name| self.is_enabled(name)),
            )),
        }
    }

    fn cmd_exit(&self) -> Outcome {
        self.terminal.write_line("Exiting shell");
        Outcome::Terminate
    }

    async fn cmd_clear(&self) -> VshResult<Outcome> {
        self.terminal.clear_terminal().await?;
        Ok(Outcome::empty())
    }
}
