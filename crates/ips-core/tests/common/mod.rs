pub mod memory_provider;
