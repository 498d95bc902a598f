mod cutout_tests;
mod raster_tests;
