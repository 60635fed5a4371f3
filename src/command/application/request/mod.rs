pub mod command_request;
