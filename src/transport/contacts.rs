use serde::Deserialize;

use super::TransportError;
use super::scalar::TransportScalar;
use crate::domain::{
    Contact, ContactGroup, ContactId, CreateContactBag, CreateGroupBag, GroupId, GroupName,
    RawPhoneNumber,
};

#[derive(Debug, Clone, Deserialize)]
struct ContactJson {
    id: String,
    #[serde(default)]
    phone_number: Option<TransportScalar>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GroupJson {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    contacts_count: Option<u32>,
}

pub fn encode_create_contact_form(request: &CreateContactBag) -> Vec<(String, String)> {
    let mut params = vec![(
        "phone_number".to_owned(),
        request.phone_number().raw().to_owned(),
    )];
    push_optional(&mut params, "email", request.email.as_deref());
    push_optional(&mut params, "first_name", request.first_name.as_deref());
    push_optional(&mut params, "last_name", request.last_name.as_deref());
    push_optional(&mut params, "description", request.description.as_deref());
    params
}

pub fn encode_create_group_form(request: &CreateGroupBag) -> Vec<(String, String)> {
    let mut params = vec![("name".to_owned(), request.name().as_str().to_owned())];
    push_optional(&mut params, "description", request.description.as_deref());
    params
}

fn push_optional(params: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        params.push((key.to_owned(), value.to_owned()));
    }
}

pub fn decode_contact_json_response(json: &str) -> Result<Contact, TransportError> {
    let parsed: ContactJson = serde_json::from_str(json)?;

    let id = ContactId::new(parsed.id).map_err(|_| TransportError::MissingField { field: "id" })?;
    let phone_number = match non_blank(parsed.phone_number.map(TransportScalar::into_string)) {
        Some(value) => Some(
            RawPhoneNumber::new(value.as_str())
                .map_err(|_| TransportError::InvalidPhoneNumber { value })?,
        ),
        None => None,
    };

    Ok(Contact {
        id,
        phone_number,
        email: non_blank(parsed.email),
        first_name: non_blank(parsed.first_name),
        last_name: non_blank(parsed.last_name),
    })
}

pub fn decode_group_json_response(json: &str) -> Result<ContactGroup, TransportError> {
    let parsed: GroupJson = serde_json::from_str(json)?;

    Ok(ContactGroup {
        id: GroupId::new(parsed.id).map_err(|_| TransportError::MissingField { field: "id" })?,
        name: GroupName::new(parsed.name)
            .map_err(|_| TransportError::MissingField { field: "name" })?,
        description: non_blank(parsed.description),
        contacts_count: parsed.contacts_count,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|it| !it.trim().is_empty())
}
