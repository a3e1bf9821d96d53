// CLI definitions using clap

use clap::Parser;

/// Takes no options: plug in the bootloader and the script runs.
#[derive(Parser)]
#[command(name = "autoflash")]
#[command(author, version, about = "Runs flash.sh whenever an Atmel DFU bootloader (03eb:2ff6) is attached")]
pub struct Cli {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rejects_arguments() {
        assert!(Cli::try_parse_from(["autoflash"]).is_ok());
        assert!(Cli::try_parse_from(["autoflash", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["autoflash", "extra"]).is_err());
    }
}
