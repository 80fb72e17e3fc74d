pub mod atp;
