pub mod promising;
