mod derive_tests;
mod sync_tests;
