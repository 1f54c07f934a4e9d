mod classify_tests;
