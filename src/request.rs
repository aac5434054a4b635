//! Request descriptors and the builder that turns `(verb, resource, payload)` into them.
//!
//! A [`RequestDescriptor`] is plain data: method, URL, headers, query pairs, and body. It is
//! built fresh for every call from a configuration snapshot and handed to an
//! [`HttpTransport`](crate::http::HttpTransport) exactly once.

// crates.io
use http::{HeaderMap, HeaderValue, Method, header::CONTENT_TYPE};
// self
use crate::{_prelude::*, auth, config::Config, error::ConfigError};

/// Loosely typed payload used for query parameters and JSON bodies.
pub type Payload = serde_json::Value;

/// HTTP verbs accepted by the connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
	/// `GET`; the payload becomes query parameters.
	Get,
	/// `POST`; the payload becomes a JSON body.
	Post,
	/// `PUT`; the payload becomes a JSON body.
	Put,
	/// `PATCH`; the payload becomes a JSON body.
	Patch,
	/// `DELETE`; the payload is ignored.
	Delete,
}
impl Verb {
	/// Returns the upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Verb::Get => "GET",
			Verb::Post => "POST",
			Verb::Put => "PUT",
			Verb::Patch => "PATCH",
			Verb::Delete => "DELETE",
		}
	}

	/// Returns `true` for verbs that carry a request body.
	pub const fn has_body(self) -> bool {
		matches!(self, Verb::Post | Verb::Put | Verb::Patch)
	}
}
impl Display for Verb {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Verb {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_uppercase().as_str() {
			"GET" => Ok(Verb::Get),
			"POST" => Ok(Verb::Post),
			"PUT" => Ok(Verb::Put),
			"PATCH" => Ok(Verb::Patch),
			"DELETE" => Ok(Verb::Delete),
			_ => Err(Error::unsupported_method(s)),
		}
	}
}
impl TryFrom<&Method> for Verb {
	type Error = Error;

	fn try_from(method: &Method) -> Result<Self> {
		method.as_str().parse()
	}
}
impl From<Verb> for Method {
	fn from(verb: Verb) -> Self {
		match verb {
			Verb::Get => Method::GET,
			Verb::Post => Method::POST,
			Verb::Put => Method::PUT,
			Verb::Patch => Method::PATCH,
			Verb::Delete => Method::DELETE,
		}
	}
}

/// File-like value sent as one multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
	/// Declared file name, sent as the part's `filename`.
	pub file_name: String,
	/// Raw file contents.
	pub bytes: Vec<u8>,
	/// Optional MIME type for the part.
	pub content_type: Option<String>,
}
impl UploadFile {
	/// Wraps in-memory contents under the given file name.
	pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		Self { file_name: file_name.into(), bytes: bytes.into(), content_type: None }
	}

	/// Sets the MIME type of the part.
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());

		self
	}
}
impl Debug for UploadFile {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UploadFile")
			.field("file_name", &self.file_name)
			.field("len", &self.bytes.len())
			.field("content_type", &self.content_type)
			.finish()
	}
}

/// One named field of a multipart upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
	/// Form field name.
	pub field: String,
	/// File sent under `field`.
	pub file: UploadFile,
}

/// Encoded request body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
	/// No body.
	Empty,
	/// JSON-encoded bytes.
	Json(Vec<u8>),
	/// Multipart form, one part per field.
	Multipart(Vec<FilePart>),
}

/// Fully specified outbound call.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
	/// HTTP verb.
	pub method: Verb,
	/// Absolute URL: base URL joined with the resource path.
	pub url: String,
	/// Authentication, negotiation, and content headers.
	pub headers: HeaderMap,
	/// Query pairs in insertion order.
	pub query: Vec<(String, String)>,
	/// Request body.
	pub body: RequestBody,
}
impl RequestDescriptor {
	/// Returns `true` when the body is a multipart form.
	pub fn is_multipart(&self) -> bool {
		matches!(self.body, RequestBody::Multipart(_))
	}

	/// Decodes the JSON body, if there is one.
	pub fn json_body(&self) -> Option<Payload> {
		match &self.body {
			RequestBody::Json(bytes) => serde_json::from_slice(bytes).ok(),
			_ => None,
		}
	}
}

/// Builds a descriptor for a JSON or query-parameter request.
///
/// `GET` turns an object payload into query pairs, `POST`/`PUT`/`PATCH` encode it as a JSON
/// body, and `DELETE` ignores it. A `null` payload is treated as absent.
pub fn build(
	verb: Verb,
	resource: &str,
	payload: Option<&Payload>,
	config: &Config,
) -> Result<RequestDescriptor> {
	let mut descriptor = base_descriptor(verb, resource, config)?;
	let Some(payload) = payload.filter(|value| !value.is_null()) else {
		return Ok(descriptor);
	};

	match verb {
		Verb::Get => descriptor.query = query_pairs(payload)?,
		Verb::Post | Verb::Put | Verb::Patch => {
			let bytes = serde_json::to_vec(payload)
				.map_err(|e| Error::invalid_payload(format!("JSON encoding failed: {e}")))?;

			descriptor.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
			descriptor.body = RequestBody::Json(bytes);
		},
		Verb::Delete => {},
	}

	Ok(descriptor)
}

/// Builds a multipart upload descriptor with one part per `(field, file)` entry.
pub fn build_upload<I, K>(
	verb: Verb,
	resource: &str,
	files: I,
	config: &Config,
) -> Result<RequestDescriptor>
where
	I: IntoIterator<Item = (K, UploadFile)>,
	K: Into<String>,
{
	if !verb.has_body() {
		return Err(Error::unsupported_method(verb.as_str()));
	}

	let mut descriptor = base_descriptor(verb, resource, config)?;
	let parts =
		files.into_iter().map(|(field, file)| FilePart { field: field.into(), file }).collect();

	descriptor.body = RequestBody::Multipart(parts);

	Ok(descriptor)
}

/// Appends `resource` to `base`, adding a `/` only when neither side has one.
pub fn join_url(base: &str, resource: &str) -> String {
	if resource.is_empty() || base.ends_with('/') || resource.starts_with('/') {
		format!("{base}{resource}")
	} else {
		format!("{base}/{resource}")
	}
}

fn base_descriptor(verb: Verb, resource: &str, config: &Config) -> Result<RequestDescriptor> {
	let base_url = config
		.base_url
		.as_deref()
		.filter(|url| !url.is_empty())
		.ok_or(ConfigError::NotConfigured)?;
	let headers = auth::resolve_headers(&config.credentials)?;

	Ok(RequestDescriptor {
		method: verb,
		url: join_url(base_url, resource),
		headers,
		query: Vec::new(),
		body: RequestBody::Empty,
	})
}

fn query_pairs(params: &Payload) -> Result<Vec<(String, String)>> {
	let Payload::Object(map) = params else {
		return Err(Error::invalid_payload("GET parameters must be a JSON object"));
	};
	let mut pairs = Vec::with_capacity(map.len());

	for (key, value) in map {
		flatten_query(key.clone(), value, &mut pairs);
	}

	Ok(pairs)
}

fn flatten_query(key: String, value: &Payload, out: &mut Vec<(String, String)>) {
	match value {
		Payload::Null => out.push((key, String::new())),
		Payload::Bool(flag) => out.push((key, flag.to_string())),
		Payload::Number(number) => out.push((key, number.to_string())),
		Payload::String(text) => out.push((key, text.clone())),
		Payload::Array(items) =>
			for (index, item) in items.iter().enumerate() {
				flatten_query(format!("{key}[{index}]"), item, out);
			},
		Payload::Object(map) =>
			for (sub, item) in map {
				flatten_query(format!("{key}[{sub}]"), item, out);
			},
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		auth::{X_AUTH_TOKEN, X_WSSE},
		config::ConfigUpdate,
	};

	fn config(update: ConfigUpdate) -> Config {
		let mut config = Config::default();

		config.apply(update).expect("Test configuration should apply.");

		config
	}

	fn wsse_config() -> Config {
		config(ConfigUpdate::new().base_url("https://api.example.com").key("k").secret("s"))
	}

	#[test]
	fn verbs_parse_case_insensitively() {
		assert_eq!("get".parse::<Verb>().expect("Lower-case verb should parse."), Verb::Get);
		assert_eq!("Patch".parse::<Verb>().expect("Mixed-case verb should parse."), Verb::Patch);

		let err = "PATCHX".parse::<Verb>().expect_err("Unknown verbs should be rejected.");

		assert!(matches!(err, Error::UnsupportedMethod { ref method } if method == "PATCHX"));
		assert_eq!(Method::from(Verb::Delete), Method::DELETE);
		assert!(Verb::try_from(&Method::HEAD).is_err());
	}

	#[test]
	fn get_signs_and_joins_url() {
		let descriptor =
			build(Verb::Get, "casefiles", None, &wsse_config()).expect("GET should build.");

		assert_eq!(descriptor.url, "https://api.example.com/casefiles");
		assert!(!descriptor.headers[X_WSSE].is_empty());
		assert!(!descriptor.headers.contains_key(X_AUTH_TOKEN));
		assert_eq!(descriptor.body, RequestBody::Empty);
	}

	#[test]
	fn get_payload_becomes_query() {
		let params = json!({ "page": 2 });
		let descriptor =
			build(Verb::Get, "casefiles", Some(&params), &wsse_config()).expect("GET should build.");

		assert_eq!(descriptor.query, vec![("page".to_owned(), "2".to_owned())]);
		assert_eq!(descriptor.body, RequestBody::Empty);
	}

	#[test]
	fn nested_query_uses_indexed_bracket_keys() {
		let params = json!({ "ids": [1, 2], "filter": { "status": "open" }, "q": null, "all": true });
		let descriptor =
			build(Verb::Get, "casefiles", Some(&params), &wsse_config()).expect("GET should build.");

		assert_eq!(
			descriptor.query,
			vec![
				("ids[0]".to_owned(), "1".to_owned()),
				("ids[1]".to_owned(), "2".to_owned()),
				("filter[status]".to_owned(), "open".to_owned()),
				("q".to_owned(), String::new()),
				("all".to_owned(), "true".to_owned()),
			]
		);
	}

	#[test]
	fn arrays_of_objects_nest_under_their_index() {
		let params = json!({ "signers": [{ "name": "Ann" }, { "name": "Bo" }] });
		let descriptor =
			build(Verb::Get, "casefiles", Some(&params), &wsse_config()).expect("GET should build.");

		assert_eq!(
			descriptor.query,
			vec![
				("signers[0][name]".to_owned(), "Ann".to_owned()),
				("signers[1][name]".to_owned(), "Bo".to_owned()),
			]
		);
	}

	#[test]
	fn get_rejects_non_object_parameters() {
		let params = json!(["page", 2]);
		let err = build(Verb::Get, "casefiles", Some(&params), &wsse_config())
			.expect_err("Array parameters should be rejected.");

		assert!(matches!(err, Error::InvalidPayload { .. }));
	}

	#[test]
	fn write_verbs_encode_json_bodies() {
		let data = json!({ "title": "doc" });

		for verb in [Verb::Post, Verb::Put, Verb::Patch] {
			let descriptor =
				build(verb, "casefiles", Some(&data), &wsse_config()).expect("Write should build.");

			assert_eq!(descriptor.body, RequestBody::Json(br#"{"title":"doc"}"#.to_vec()));
			assert_eq!(descriptor.headers[CONTENT_TYPE], "application/json");
			assert!(descriptor.query.is_empty());
		}
	}

	#[test]
	fn delete_ignores_payload() {
		let data = json!({ "force": true });
		let descriptor = build(Verb::Delete, "casefiles/1", Some(&data), &wsse_config())
			.expect("DELETE should build.");

		assert_eq!(descriptor.body, RequestBody::Empty);
		assert!(descriptor.query.is_empty());
		assert!(!descriptor.headers.contains_key(CONTENT_TYPE));
	}

	#[test]
	fn upload_keeps_field_and_file_names() {
		let descriptor = build_upload(
			Verb::Post,
			"documents",
			[("pdfFile", UploadFile::new("contract.pdf", b"%PDF".to_vec()))],
			&wsse_config(),
		)
		.expect("Upload should build.");

		assert!(descriptor.is_multipart());

		let RequestBody::Multipart(parts) = descriptor.body else {
			panic!("Upload body should be multipart.");
		};

		assert_eq!(parts.len(), 1);
		assert_eq!(parts[0].field, "pdfFile");
		assert_eq!(parts[0].file.file_name, "contract.pdf");
	}

	#[test]
	fn upload_rejects_bodyless_verbs() {
		let err = build_upload(
			Verb::Get,
			"documents",
			[("file", UploadFile::new("a.txt", "a"))],
			&wsse_config(),
		)
		.expect_err("GET uploads should be rejected.");

		assert!(matches!(err, Error::UnsupportedMethod { .. }));
	}

	#[test]
	fn missing_base_url_is_a_configuration_error() {
		let err = build(Verb::Get, "casefiles", None, &Config::default())
			.expect_err("Unconfigured builds should fail.");

		assert!(matches!(err, Error::Config(ConfigError::NotConfigured)));
	}

	#[test]
	fn url_join_does_not_normalize() {
		assert_eq!(join_url("https://x.test", "a"), "https://x.test/a");
		assert_eq!(join_url("https://x.test/", "a"), "https://x.test/a");
		assert_eq!(join_url("https://x.test", "/a"), "https://x.test/a");
		assert_eq!(join_url("https://x.test/", "/a"), "https://x.test//a");
		assert_eq!(join_url("https://x.test/api", ""), "https://x.test/api");
	}

	#[test]
	fn rebuilding_is_stable_apart_from_the_nonce() {
		let data = json!({ "title": "doc" });
		let config = wsse_config();
		let mut first = build(Verb::Post, "casefiles", Some(&data), &config).expect("First build.");
		let mut second = build(Verb::Post, "casefiles", Some(&data), &config).expect("Second build.");

		first.headers.remove(X_WSSE);
		second.headers.remove(X_WSSE);

		assert_eq!(first, second);
	}

	#[test]
	fn token_config_is_fully_deterministic() {
		let config = config(ConfigUpdate::new().base_url("https://api.example.com").token("abc"));
		let first = build(Verb::Get, "casefiles", None, &config).expect("First build.");
		let second = build(Verb::Get, "casefiles", None, &config).expect("Second build.");

		assert_eq!(first, second);
		assert_eq!(first.headers[X_AUTH_TOKEN], "abc");
	}
}
