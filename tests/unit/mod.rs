mod fake_server;

mod auth_tests;
mod result_tests;
