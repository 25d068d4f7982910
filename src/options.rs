use arg_parser::CmdArgs;

#[derive(CmdArgs, Debug, Default)]
#[metadata(description = "Lox scanner. Prints the tokens of a script, or of each line typed at the prompt.", usage_exit_code = 64)]
pub struct Options {
    #[arg(
        positional = true,
        description = "Script to scan, starts the prompt when omitted"
    )]
    pub script: Option<String>,

    #[arg(
        short = "-q",
        long = "--quiet",
        description = "Only report diagnostics, do not print tokens"
    )]
    pub quiet: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn no_arguments_starts_prompt() {
        let opts = Options::try_parse_from(args(&[])).unwrap();
        assert_eq!(opts.script, None);
        assert!(!opts.quiet);
    }

    #[test]
    fn script_and_flag() {
        let opts = Options::try_parse_from(args(&["-q", "main.lox"])).unwrap();
        assert_eq!(opts.script, Some("main.lox".to_owned()));
        assert!(opts.quiet);

        let opts = Options::try_parse_from(args(&["main.lox", "--quiet"])).unwrap();
        assert_eq!(opts.script, Some("main.lox".to_owned()));
        assert!(opts.quiet);
    }

    #[test]
    fn rejects_extra_scripts() {
        assert!(Options::try_parse_from(args(&["a.lox", "b.lox"])).is_err());
    }

    #[test]
    fn rejects_repeated_and_unknown_options() {
        assert!(Options::try_parse_from(args(&["-q", "--quiet"])).is_err());
        assert!(Options::try_parse_from(args(&["--verbose"])).is_err());
    }

    #[test]
    fn help_is_requested_with_empty_message() {
        assert_eq!(Options::try_parse_from(args(&["--help"])).unwrap_err(), "");
    }
}
