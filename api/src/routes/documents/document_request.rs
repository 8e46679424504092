use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AddedDocument {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedDocument {
    pub deleted: String,
}
