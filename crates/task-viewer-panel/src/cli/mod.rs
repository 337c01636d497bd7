/*
[INPUT]:  Subcommand arguments
[OUTPUT]: Interactive CLI flows
[POS]:    CLI layer - module wiring for the binary
[UPDATE]: When adding interactive commands
*/

pub mod init;
pub mod interactive;
