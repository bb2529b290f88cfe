#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Timelike, Utc};
use serde_json::{Value, json};
use smsapi::{
    ApiToken, AssignContactToGroupBag, Contact, ContactGroup, CreateContactBag, CreateGroupBag,
    GroupName, MessageText, RawPhoneNumber, ScheduleDate, SmsapiClient, SmsapiError,
};
use wiremock::matchers::{any, header};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "test-token";

/// In-process stand-in for the SMSAPI gateway.
///
/// Keeps contacts and groups in memory so group sends resolve real members. Batch results are
/// listed in reverse order, and numbers that are not 11 digits long are reported as invalid.
#[derive(Clone, Default)]
pub struct FakeGateway {
    state: Arc<Mutex<GatewayState>>,
}

#[derive(Default)]
struct GatewayState {
    next_id: u64,
    contacts: HashMap<String, String>,
    groups: HashMap<String, FakeGroup>,
}

struct FakeGroup {
    name: String,
    members: Vec<String>,
}

impl Respond for FakeGateway {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let form: HashMap<String, String> = url::form_urlencoded::parse(&request.body)
            .into_owned()
            .collect();
        let path = request.url.path().trim_start_matches('/').to_owned();
        let segments: Vec<&str> = path.split('/').collect();
        let mut state = self.state.lock().unwrap();

        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["sms.do"]) => state.send(&form),
            ("POST", ["contacts"]) => state.create_contact(&form),
            ("DELETE", ["contacts", id]) => state.delete_contact(id),
            ("POST", ["contacts", "groups"]) => state.create_group(&form),
            ("PUT", ["contacts", contact_id, "groups", group_id]) => {
                state.assign(contact_id, group_id)
            }
            ("DELETE", ["contacts", "groups", id]) => state.delete_group(id),
            _ => not_found("not_found", "Unknown endpoint"),
        }
    }
}

impl GatewayState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{:08x}", self.next_id)
    }

    fn send(&mut self, form: &HashMap<String, String>) -> ResponseTemplate {
        let Some(message) = form.get("message") else {
            return ok(json!({"error": 11, "message": "Message is empty"}));
        };

        let recipients: Vec<String> = if let Some(to) = form.get("to") {
            to.split(',').map(str::to_owned).collect()
        } else if let Some(name) = form.get("group") {
            self.groups
                .values()
                .filter(|group| &group.name == name)
                .flat_map(|group| group.members.iter())
                .filter_map(|member| self.contacts.get(member).cloned())
                .collect()
        } else {
            Vec::new()
        };

        let (accepted, invalid): (Vec<String>, Vec<String>) = recipients
            .into_iter()
            .partition(|number| number.len() == 11);
        if accepted.is_empty() {
            return ok(json!({"error": 13, "message": "No correct phone numbers"}));
        }

        let date_sent = form
            .get("date")
            .and_then(|it| it.parse::<i64>().ok())
            .unwrap_or_else(|| Utc::now().timestamp());
        let idx = form.get("idx").cloned();

        let mut list = Vec::new();
        for number in accepted.iter().rev() {
            list.push(json!({
                "id": self.next_id("ID"),
                "points": 0.16,
                "number": number,
                "date_sent": date_sent,
                "submitted_number": number,
                "status": "QUEUE",
                "error": null,
                "idx": idx,
            }));
        }

        let mut body = json!({"count": list.len(), "list": list});
        if form.get("details").map(String::as_str) == Some("1") {
            let length = message.chars().count();
            let parts = if length <= 160 { 1 } else { length.div_ceil(153) };
            body["message"] = json!(message);
            body["length"] = json!(length);
            body["parts"] = json!(parts);
        }
        if !invalid.is_empty() {
            body["invalid_numbers"] = invalid
                .iter()
                .map(|number| {
                    json!({
                        "number": number,
                        "submitted_number": number,
                        "message": "Invalid phone number",
                    })
                })
                .collect::<Value>();
        }
        ok(body)
    }

    fn create_contact(&mut self, form: &HashMap<String, String>) -> ResponseTemplate {
        let Some(phone_number) = form.get("phone_number") else {
            return ResponseTemplate::new(400).set_body_json(json!({
                "message": "Phone number is required",
                "error": "invalid_phone_number",
                "code": 400,
            }));
        };
        let id = self.next_id("");
        self.contacts.insert(id.clone(), phone_number.clone());
        ResponseTemplate::new(201).set_body_json(json!({
            "id": id,
            "phone_number": phone_number,
            "email": form.get("email").cloned().unwrap_or_default(),
            "first_name": form.get("first_name").cloned().unwrap_or_default(),
            "last_name": form.get("last_name").cloned().unwrap_or_default(),
            "gender": "undefined",
        }))
    }

    fn delete_contact(&mut self, id: &str) -> ResponseTemplate {
        if self.contacts.remove(id).is_none() {
            return not_found("not_found_contact", "Contact not found");
        }
        for group in self.groups.values_mut() {
            group.members.retain(|member| member != id);
        }
        ResponseTemplate::new(204)
    }

    fn create_group(&mut self, form: &HashMap<String, String>) -> ResponseTemplate {
        let name = form.get("name").cloned().unwrap_or_default();
        let id = self.next_id("");
        self.groups.insert(
            id.clone(),
            FakeGroup {
                name: name.clone(),
                members: Vec::new(),
            },
        );
        ResponseTemplate::new(201).set_body_json(json!({
            "id": id,
            "name": name,
            "description": form.get("description").cloned().unwrap_or_default(),
            "contacts_count": 0,
            "permissions": [],
        }))
    }

    fn assign(&mut self, contact_id: &str, group_id: &str) -> ResponseTemplate {
        if !self.contacts.contains_key(contact_id) {
            return not_found("not_found_contact", "Contact not found");
        }
        let Some(group) = self.groups.get_mut(group_id) else {
            return not_found("not_found_group", "Group not found");
        };
        if !group.members.iter().any(|member| member == contact_id) {
            group.members.push(contact_id.to_owned());
        }
        ResponseTemplate::new(201).set_body_json(json!([{"id": contact_id}]))
    }

    fn delete_group(&mut self, id: &str) -> ResponseTemplate {
        match self.groups.remove(id) {
            Some(_) => ResponseTemplate::new(204),
            None => not_found("not_found_group", "Group not found"),
        }
    }
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn not_found(error: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "message": message,
        "error": error,
        "code": 404,
    }))
}

/// Start a gateway that serves requests carrying [`TOKEN`] and rejects everything else.
pub async fn start_gateway() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(header("authorization", "Bearer test-token"))
        .respond_with(FakeGateway::default())
        .mount(&server)
        .await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": 101, "message": "Authorization failed"})),
        )
        .mount(&server)
        .await;
    server
}

pub fn client_for(server: &MockServer) -> SmsapiClient {
    client_with_token(server, TOKEN)
}

pub fn client_with_token(server: &MockServer, token: &str) -> SmsapiClient {
    SmsapiClient::builder(ApiToken::new(token).unwrap())
        .base_url(server.uri())
        .build()
        .unwrap()
}

/// Form fields of the most recent request the gateway received.
pub async fn last_form(server: &MockServer) -> HashMap<String, String> {
    let requests = server.received_requests().await.unwrap();
    let request = requests.last().expect("no request received");
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

pub fn phone(raw: &str) -> RawPhoneNumber {
    RawPhoneNumber::new(raw).unwrap()
}

pub fn message() -> MessageText {
    MessageText::new("some message").unwrap()
}

pub fn tomorrow_noon() -> ScheduleDate {
    let tomorrow = Utc::now() + Duration::days(1);
    let noon = tomorrow
        .with_hour(12)
        .and_then(|it| it.with_minute(0))
        .and_then(|it| it.with_second(0))
        .and_then(|it| it.with_nanosecond(0))
        .unwrap();
    ScheduleDate::new(noon).unwrap()
}

pub fn yesterday() -> ScheduleDate {
    let date = DateTime::from_timestamp(Utc::now().timestamp() - 86_400, 0).unwrap();
    ScheduleDate::new(date).unwrap()
}

pub async fn create_group_with_contact(
    client: &SmsapiClient,
    number: &str,
) -> (ContactGroup, Contact) {
    let groups = client.contacts().groups();
    let name = format!("some group {}", Utc::now().timestamp_nanos_opt().unwrap_or_default());
    let group = groups
        .create_group(&CreateGroupBag::new(GroupName::new(name).unwrap()))
        .await
        .unwrap();
    let contact = client
        .contacts()
        .create_contact(&CreateContactBag::with_phone_number(phone(number)))
        .await
        .unwrap();
    groups
        .assign_contact_to_group(&AssignContactToGroupBag::new(
            contact.id.clone(),
            group.id.clone(),
        ))
        .await
        .unwrap();
    (group, contact)
}

/// Tear down a fixture from [`create_group_with_contact`], checking the group is really gone.
pub async fn delete_group_with_contact(
    client: &SmsapiClient,
    group: &ContactGroup,
    contact: &Contact,
) {
    let groups = client.contacts().groups();
    groups.delete_group(&group.id).await.unwrap();
    let err = groups.delete_group(&group.id).await.unwrap_err();
    assert!(
        matches!(err, SmsapiError::Api { http_status: 404, .. }),
        "group still present: {err:?}"
    );
    client.contacts().delete_contact(&contact.id).await.unwrap();
}
