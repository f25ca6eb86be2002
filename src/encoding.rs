//! Best-effort repair of mojibake in backend text.
//!
//! Parts of the upstream dataset were ingested as latin-1 bytes and later
//! re-decoded as UTF-8, so the API can serve strings like "CooperaÃ§Ã£o"
//! where "Cooperação" was meant. The repair re-encodes every char as its
//! latin-1 byte and re-decodes the byte sequence as UTF-8. When the text
//! contains chars outside latin-1, or the bytes are not valid UTF-8, the
//! input is returned unchanged; clean ASCII round-trips to itself.
//!
//! The heuristic is lossy by nature and never errors; the real fix belongs
//! in the backend's ingestion.

/// Undo a latin-1/UTF-8 double decode, returning the input on any failure.
pub fn repair_mojibake(text: &str) -> String {
    match try_repair(text) {
        Some(repaired) => repaired,
        None => text.to_string(),
    }
}

/// Repair an optional field, passing `None` through.
pub fn repair_opt(text: Option<&str>) -> Option<String> {
    text.map(repair_mojibake)
}

fn try_repair(text: &str) -> Option<String> {
    // Fast path: pure ASCII cannot be mojibake.
    if text.is_ascii() {
        return None;
    }

    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let code = ch as u32;
        if code > 0xFF {
            // Outside latin-1: this text was never double-decoded.
            return None;
        }
        bytes.push(code as u8);
    }

    let repaired = String::from_utf8(bytes).ok()?;
    if repaired == text {
        return None;
    }
    Some(repaired)
}
