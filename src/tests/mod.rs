// Test modules for the llm-conformance crate
//
// Each source module has a corresponding test file. Anything that needs a
// live endpoint or an HTTP mock lives in the integration tests instead.
