pub mod parser_config;
