mod cli;
mod jq_exec;
mod logging;

use std::process::ExitCode;

use colored::Colorize;

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    logging::init_logging(command_line_interface.log_format, command_line_interface.log_level);
    match command_line_interface.run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}
