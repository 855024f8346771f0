use crate::error::{StoreError, ValidationError};
use crate::models::{Contact, NewContact};
use crate::Database;

pub const MAX_SUBJECT_LENGTH: usize = 200;

pub fn validate(input: &NewContact) -> Result<(), ValidationError> {
    if input.email.trim().is_empty() {
        return Err(ValidationError::Required("email"));
    }
    if !input.email.contains('@') || !input.email.contains('.') {
        return Err(ValidationError::Invalid {
            field: "email",
            reason: "not a valid email address".to_string(),
        });
    }
    if input.subject.trim().is_empty() {
        return Err(ValidationError::Required("subject"));
    }
    if input.subject.len() > MAX_SUBJECT_LENGTH {
        return Err(ValidationError::TooLong {
            field: "subject",
            max: MAX_SUBJECT_LENGTH,
        });
    }
    if input.message.trim().is_empty() {
        return Err(ValidationError::Required("message"));
    }
    Ok(())
}

pub fn create_contact(db: &Database, input: &NewContact) -> Result<i64, StoreError> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO contacts (name, email, subject, message) VALUES (?, ?, ?, ?)",
        (&input.name, &input.email, &input.subject, &input.message),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_contacts(db: &Database, limit: usize, offset: usize) -> Result<Vec<Contact>, StoreError> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, name, email, subject, message, submitted_at FROM contacts \
         ORDER BY submitted_at DESC LIMIT ? OFFSET ?",
    )?;
    let contacts = stmt
        .query_map((limit, offset), |row| {
            Ok(Contact {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                subject: row.get(3)?,
                message: row.get(4)?,
                submitted_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(contacts)
}
