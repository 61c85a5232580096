mod buffer_tests;
mod tailer_tests;
