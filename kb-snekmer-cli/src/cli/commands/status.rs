//! Print module status as JSON.

pub fn run() -> anyhow::Result<()> {
    let status = crate::methods::status::status();
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
