pub mod dmi;
