mod fakes;
mod session_tests;
