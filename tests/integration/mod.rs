/// Integration tests over real record sources
mod basic_integration;
mod tool_workflow;
