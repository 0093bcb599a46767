// Memoization scope handed to providers
pub mod computation;

// Domain-specific error types
pub mod errors;

// Raw inputs and the shared provider bundle
pub mod inputs;

// Provider result shapes
pub mod metric_result;

// Port interfaces
pub mod ports;

// Output record
pub mod summary;
