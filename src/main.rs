use std::env::args_os;
use std::process::ExitCode;

use strip_stitcher::{stitch_directory, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match stitch_directory(&arguments) {
        Ok(summary) => {
            println!(
                "Stitching successful: {} images combined into {}x{}",
                summary.number_of_sources, summary.width, summary.height
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Stitching failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
