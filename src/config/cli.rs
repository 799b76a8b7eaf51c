use clap::Parser;
use std::path::PathBuf;

/// Arguments shared by both entry points. Running without any is the normal case.
#[derive(Debug, Clone, Parser)]
#[command(about = "Checks Gemini and Firestore credentials")]
pub struct CliArgs {
    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args = CliArgs::try_parse_from(["bootcheck"]).unwrap();
        assert!(args.env_file.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_env_file_and_verbose() {
        let args =
            CliArgs::try_parse_from(["bootcheck", "--env-file", "ci.env", "-v"]).unwrap();
        assert_eq!(args.env_file, Some(PathBuf::from("ci.env")));
        assert!(args.verbose);
    }
}
