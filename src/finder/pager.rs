//! Paging of long text through `$PAGER`

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use tracing::warn;

use crate::error::LedgerResult;

/// Show `text` through `pager`, or write it to `fallback` when there is no
/// pager or it cannot be started
pub fn page(text: &str, pager: Option<&str>, fallback: &mut dyn Write) -> LedgerResult<()> {
    let Some(pager) = pager else {
        fallback.write_all(text.as_bytes())?;
        return Ok(());
    };

    let mut parts = pager.split_whitespace();
    let Some(program) = parts.next() else {
        fallback.write_all(text.as_bytes())?;
        return Ok(());
    };

    let mut child = match Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            warn!(pager, error = %e, "Could not start pager, printing instead");
            fallback.write_all(text.as_bytes())?;
            return Ok(());
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        // The pager may exit before reading everything
        match stdin.write_all(text.as_bytes()) {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
            other => other?,
        }
    }
    child.wait()?;
    Ok(())
}
