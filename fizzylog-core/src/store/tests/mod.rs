mod rollup_tests;
