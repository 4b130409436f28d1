use crate::discovery::DEFAULT_PATTERN;
use crate::raster::reader::BoundsPolicy;
use crate::raster::writer::DEFAULT_JPEG_QUALITY;
use crate::strips::BlendMethod;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_directory_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_no_averaging_argument(command);
        let command = Self::register_blend_method_argument(command);
        let command = Self::register_bounds_policy_argument(command);
        let command = Self::register_pattern_argument(command);
        let command = Self::register_threads_argument(command);
        Self::register_jpeg_quality_argument(command)
    }

    fn register_input_directory_argument(command: Command) -> Command {
        command.arg(Self::create_input_directory_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_no_averaging_argument(command: Command) -> Command {
        command.arg(Self::create_no_averaging_argument())
    }

    fn register_blend_method_argument(command: Command) -> Command {
        command.arg(Self::create_blend_method_argument())
    }

    fn register_bounds_policy_argument(command: Command) -> Command {
        command.arg(Self::create_bounds_policy_argument())
    }

    fn register_pattern_argument(command: Command) -> Command {
        command.arg(Self::create_pattern_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn register_jpeg_quality_argument(command: Command) -> Command {
        command.arg(Self::create_jpeg_quality_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_directory_argument() -> Arg {
        Arg::new("input_directory")
            .help("Directory containing the source images")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path of the combined image, its extension selects the format")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_no_averaging_argument() -> Arg {
        arg!(no_averaging: -n --no_averaging "Copy every strip without blending")
    }

    fn create_blend_method_argument() -> Arg {
        arg!(blend_method: -m --blend_method <METHOD> "How five neighbouring strips are blended")
            .default_value("FloorThenSum")
            .value_parser(value_parser!(BlendMethod))
    }

    fn create_bounds_policy_argument() -> Arg {
        arg!(bounds_policy: -b --bounds_policy <POLICY> "Handling of narrow sources")
            .default_value("Reject")
            .value_parser(value_parser!(BoundsPolicy))
    }

    fn create_pattern_argument() -> Arg {
        arg!(pattern: -p --pattern <PATTERN> "File name pattern of the source images")
            .default_value(DEFAULT_PATTERN)
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn create_jpeg_quality_argument() -> Arg {
        arg!(jpeg_quality: -q --jpeg_quality <QUALITY> "Quality of JPEG output, 1 to 100")
            .default_value(DEFAULT_JPEG_QUALITY.to_string())
            .value_parser(value_parser!(u8).range(1..=100))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_directory: Self::extract_input_directory_argument(matches),
            output_file: Self::extract_output_file_argument(matches),
            averaging: !Self::extract_no_averaging_argument(matches),
            blend_method: Self::extract_blend_method_argument(matches),
            bounds_policy: Self::extract_bounds_policy_argument(matches),
            pattern: Self::extract_pattern_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
            jpeg_quality: Self::extract_jpeg_quality_argument(matches),
        }
    }

    fn extract_input_directory_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_directory")
            .expect("Required argument input_directory not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("output_file")
            .expect("Required argument output_file not provided")
            .clone()
    }

    fn extract_no_averaging_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("no_averaging")
    }

    fn extract_blend_method_argument(matches: &ArgMatches) -> BlendMethod {
        matches
            .get_one::<BlendMethod>("blend_method")
            .expect("Blend method must be provided, but was unset.")
            .to_owned()
    }

    fn extract_bounds_policy_argument(matches: &ArgMatches) -> BoundsPolicy {
        matches
            .get_one::<BoundsPolicy>("bounds_policy")
            .expect("Bounds policy must be provided, but was unset.")
            .to_owned()
    }

    fn extract_pattern_argument(matches: &ArgMatches) -> String {
        matches
            .get_one::<String>("pattern")
            .expect("Pattern must be provided, but was unset.")
            .clone()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_jpeg_quality_argument(matches: &ArgMatches) -> u8 {
        matches
            .get_one::<u8>("jpeg_quality")
            .expect("JPEG quality must be provided, but was unset.")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Command};

    use super::{BlendMethod, BoundsPolicy, CLIParser};

    const PROGRAM_NAME_ARGUMENT: &str = "test_program_name";

    #[test]
    fn parse_input_directory_argument() {
        let input_directory_name = "frames";
        let command = Command::new("test");
        let command = CLIParser::register_input_directory_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, input_directory_name]);
        let input_directory = CLIParser::extract_input_directory_argument(&matches);
        assert_eq!(input_directory.file_name().unwrap(), input_directory_name);
    }

    #[test]
    fn parse_output_file_argument() {
        let output_file_name = "result.png";
        let command = Command::new("test");
        let command = CLIParser::register_output_file_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, output_file_name]);
        let output_file = CLIParser::extract_output_file_argument(&matches);
        assert_eq!(output_file.file_name().unwrap(), output_file_name);
    }

    #[test]
    fn parse_no_averaging_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_no_averaging_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--no_averaging"]);
        assert!(CLIParser::extract_no_averaging_argument(&matches));
    }

    #[test]
    fn parse_blend_method_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_blend_method_argument(command);
        let matches =
            command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--blend_method", "SumThenFloor"]);
        let actual = CLIParser::extract_blend_method_argument(&matches);
        assert_eq!(actual, BlendMethod::SumThenFloor);
    }

    #[test]
    fn parse_bounds_policy_illegal_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_bounds_policy_argument(command);
        let result =
            command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--bounds_policy", "Clamp"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::InvalidValue);
        } else {
            panic!("Illegal value for bounds_policy not detected");
        }
    }

    #[test]
    fn parse_jpeg_quality_out_of_range_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_jpeg_quality_argument(command);
        let result =
            command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--jpeg_quality", "101"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::ValueValidation);
        } else {
            panic!("Out of range jpeg_quality not detected");
        }
    }

    #[test]
    fn parse_number_of_threads_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_threads_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--threads", "5"]);
        let actual = CLIParser::extract_threads_argument(&matches);
        let expected = 5;
        assert_eq!(actual, expected);
    }

    #[test]
    fn missing_output_file_is_a_usage_error() {
        let mut command = CLIParser::create_base_command();
        command = CLIParser::register_arguments(command);
        let result = command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "frames"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
            assert_eq!(error.exit_code(), 2);
        } else {
            panic!("Missing output file not detected");
        }
    }

    #[test]
    fn parse_required_arguments_only() {
        let input_directory_name = "frames";
        let input_directory_path = format!("/input_directory/{}", input_directory_name);
        let output_file_name = "outputfile.jpg";
        let output_file_path = format!("/output_directory/{}", output_file_name);
        let mut cli_parser = CLIParser::default();
        let arguments = cli_parser.parse(vec![
            PROGRAM_NAME_ARGUMENT,
            &input_directory_path,
            &output_file_path,
            "-t",
            "8",
        ]);
        assert_eq!(
            arguments.input_directory.file_name().unwrap(),
            input_directory_name,
            "input directory does not match"
        );
        assert_eq!(
            arguments.output_file.file_name().unwrap(),
            output_file_name,
            "output file does not match"
        );
        assert!(arguments.averaging, "averaging must be on by default");
        assert_eq!(
            arguments.blend_method,
            BlendMethod::FloorThenSum,
            "blend_method does not match"
        );
        assert_eq!(
            arguments.bounds_policy,
            BoundsPolicy::Reject,
            "bounds_policy does not match"
        );
        assert_eq!(arguments.pattern, "*.jpg", "pattern does not match");
        assert_eq!(
            arguments.number_of_threads, 8,
            "number_of_threads does not match"
        );
        assert_eq!(arguments.jpeg_quality, 95, "jpeg_quality does not match");
    }
}
