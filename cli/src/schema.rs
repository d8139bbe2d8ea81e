//! Schema command - print the response schema

use anyhow::Result;
use vision3d_shared::response_schema;

/// Execute the schema command
pub fn execute() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&response_schema())?);
    Ok(())
}
