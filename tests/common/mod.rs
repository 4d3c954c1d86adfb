use std::io::Write;
use tempfile::NamedTempFile;

/// Writes a JSONL scenario to a temp file, one command per line.
pub fn scenario(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

pub fn sign_up(name: &str, email: &str) -> String {
    format!(
        r#"{{"op":"sign_up","full_name":"{name}","username":"{username}","email":"{email}","password":"hunter2hunter2","confirm_password":"hunter2hunter2","terms_accepted":true}}"#,
        username = name.to_lowercase().replace(' ', ".")
    )
}

pub fn register_shop(owner: u32, name: &str, industry: &str) -> String {
    format!(
        r#"{{"op":"register_shop","owner":{owner},"name":"{name}","industry":"{industry}","shop_number":"B-12","city":"Nairobi","mall":"The Hub","whatsapp":"+254700000001"}}"#
    )
}
