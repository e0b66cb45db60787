mod html_parser_tests;
mod record_parser_tests;
