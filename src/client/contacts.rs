use super::{HttpMethod, SmsapiClient, SmsapiError, parse_error};
use crate::domain::{
    AssignContactToGroupBag, Contact, ContactGroup, ContactId, CreateContactBag, CreateGroupBag,
    GroupId,
};

/// The contacts database (`contacts`).
///
/// Group sends address the members of a contacts group, so these calls are mostly used to
/// prepare recipients for [`super::SmsFeature::send_sms_to_group`].
#[derive(Clone, Copy)]
pub struct ContactsFeature<'a> {
    client: &'a SmsapiClient,
}

impl<'a> ContactsFeature<'a> {
    pub(super) fn new(client: &'a SmsapiClient) -> Self {
        Self { client }
    }

    pub async fn create_contact(&self, bag: &CreateContactBag) -> Result<Contact, SmsapiError> {
        const OPERATION: &str = "contacts.create";
        tracing::debug!(operation = OPERATION, "creating contact");

        let params = crate::transport::encode_create_contact_form(bag);
        let url = self.client.endpoint(&["contacts"]);
        let body = self
            .client
            .execute(OPERATION, HttpMethod::Post, url, params)
            .await?;

        crate::transport::decode_contact_json_response(&body).map_err(parse_error)
    }

    pub async fn delete_contact(&self, contact_id: &ContactId) -> Result<(), SmsapiError> {
        const OPERATION: &str = "contacts.delete";
        tracing::debug!(operation = OPERATION, contact_id = contact_id.as_str(), "deleting contact");

        let url = self.client.endpoint(&["contacts", contact_id.as_str()]);
        self.client
            .execute(OPERATION, HttpMethod::Delete, url, Vec::new())
            .await?;
        Ok(())
    }

    pub fn groups(&self) -> GroupsFeature<'a> {
        GroupsFeature {
            client: self.client,
        }
    }
}

/// Contact groups (`contacts/groups`).
#[derive(Clone, Copy)]
pub struct GroupsFeature<'a> {
    client: &'a SmsapiClient,
}

impl GroupsFeature<'_> {
    pub async fn create_group(&self, bag: &CreateGroupBag) -> Result<ContactGroup, SmsapiError> {
        const OPERATION: &str = "groups.create";
        tracing::debug!(operation = OPERATION, name = bag.name().as_str(), "creating group");

        let params = crate::transport::encode_create_group_form(bag);
        let url = self.client.endpoint(&["contacts", "groups"]);
        let body = self
            .client
            .execute(OPERATION, HttpMethod::Post, url, params)
            .await?;

        crate::transport::decode_group_json_response(&body).map_err(parse_error)
    }

    /// Add a contact to a group. Assigning an existing member again is not an error.
    pub async fn assign_contact_to_group(
        &self,
        bag: &AssignContactToGroupBag,
    ) -> Result<(), SmsapiError> {
        const OPERATION: &str = "groups.assign_contact";
        tracing::debug!(
            operation = OPERATION,
            contact_id = bag.contact_id().as_str(),
            group_id = bag.group_id().as_str(),
            "assigning contact to group"
        );

        let url = self.client.endpoint(&[
            "contacts",
            bag.contact_id().as_str(),
            "groups",
            bag.group_id().as_str(),
        ]);
        self.client
            .execute(OPERATION, HttpMethod::Put, url, Vec::new())
            .await?;
        Ok(())
    }

    /// Delete a group. Its contacts stay in the database.
    pub async fn delete_group(&self, group_id: &GroupId) -> Result<(), SmsapiError> {
        const OPERATION: &str = "groups.delete";
        tracing::debug!(operation = OPERATION, group_id = group_id.as_str(), "deleting group");

        let url = self.client.endpoint(&["contacts", "groups", group_id.as_str()]);
        self.client
            .execute(OPERATION, HttpMethod::Delete, url, Vec::new())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{FakeTransport, assert_param, make_client};
    use super::*;
    use crate::domain::{GroupName, RawPhoneNumber};

    #[tokio::test]
    async fn create_contact_posts_form_and_decodes_contact() {
        let transport = FakeTransport::new().respond(
            201,
            r#"{"id": "5b802c8d", "phone_number": "48500000000", "email": "", "first_name": "Jan"}"#,
        );
        let client = make_client(transport.clone());

        let mut bag =
            CreateContactBag::with_phone_number(RawPhoneNumber::new("+48500000000").unwrap());
        bag.first_name = Some("Jan".to_owned());

        let contact = client.contacts().create_contact(&bag).await.unwrap();
        assert_eq!(contact.id.as_str(), "5b802c8d");
        assert_eq!(contact.first_name.as_deref(), Some("Jan"));
        assert!(contact.email.is_none());

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url.as_str(), "https://example.invalid/contacts");
        assert_param(&request.form, "phone_number", "48500000000");
        assert_param(&request.form, "first_name", "Jan");
    }

    #[tokio::test]
    async fn create_contact_maps_api_error() {
        let transport = FakeTransport::new().respond(
            400,
            r#"{"message": "Contact already exists", "error": "contact_conflict", "code": 409}"#,
        );
        let client = make_client(transport);

        let bag = CreateContactBag::with_phone_number(RawPhoneNumber::new("48500000000").unwrap());
        let err = client.contacts().create_contact(&bag).await.unwrap_err();
        match err {
            SmsapiError::Api {
                http_status, code, ..
            } => {
                assert_eq!(http_status, 400);
                assert_eq!(code.as_str(), "contact_conflict");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_contact_rejects_malformed_body() {
        let transport = FakeTransport::new().respond(201, r#"{"phone_number": "48500000000"}"#);
        let client = make_client(transport);

        let bag = CreateContactBag::with_phone_number(RawPhoneNumber::new("48500000000").unwrap());
        let err = client.contacts().create_contact(&bag).await.unwrap_err();
        assert!(matches!(err, SmsapiError::Parse(_)));
    }

    #[tokio::test]
    async fn delete_contact_issues_delete_without_body() {
        let transport = FakeTransport::new().respond(204, "");
        let client = make_client(transport.clone());

        client
            .contacts()
            .delete_contact(&ContactId::new("c1").unwrap())
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url.as_str(), "https://example.invalid/contacts/c1");
        assert!(request.form.is_empty());
    }

    #[tokio::test]
    async fn create_group_posts_name() {
        let transport = FakeTransport::new().respond(
            201,
            r#"{"id": "g1", "name": "customers", "description": "", "contacts_count": 0}"#,
        );
        let client = make_client(transport.clone());

        let bag = CreateGroupBag::new(GroupName::new("customers").unwrap());
        let group = client.contacts().groups().create_group(&bag).await.unwrap();
        assert_eq!(group.id.as_str(), "g1");
        assert_eq!(group.name.as_str(), "customers");
        assert_eq!(group.contacts_count, Some(0));

        let request = transport.last_request().unwrap();
        assert_eq!(request.url.as_str(), "https://example.invalid/contacts/groups");
        assert_param(&request.form, "name", "customers");
    }

    #[tokio::test]
    async fn assign_contact_uses_put_on_membership_path() {
        let transport = FakeTransport::new().respond(201, r#"[{"id": "c1"}]"#);
        let client = make_client(transport.clone());

        let bag = AssignContactToGroupBag::new(
            ContactId::new("c1").unwrap(),
            GroupId::new("g1").unwrap(),
        );
        client
            .contacts()
            .groups()
            .assign_contact_to_group(&bag)
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(
            request.url.as_str(),
            "https://example.invalid/contacts/c1/groups/g1"
        );
    }

    #[tokio::test]
    async fn delete_group_surfaces_not_found() {
        let transport = FakeTransport::new().respond(
            404,
            r#"{"message": "Group not found", "error": "not_found_group", "code": 404}"#,
        );
        let client = make_client(transport.clone());

        let err = client
            .contacts()
            .groups()
            .delete_group(&GroupId::new("missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SmsapiError::Api { http_status: 404, .. }));

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(
            request.url.as_str(),
            "https://example.invalid/contacts/groups/missing"
        );
    }
}
