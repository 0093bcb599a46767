// Summary orchestration: registry, gate, assembler, builder
pub mod summary;
