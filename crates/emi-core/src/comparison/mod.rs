pub mod tenure;
