mod wcs_tests;
