//! Per-request `oauth_*` protocol parameters and `Authorization` header rendering.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::SignatureError,
	signer::{
		encode::{base_string, percent_encode},
		mode::{SignatureMethod, SigningMode},
	},
};

/// Protocol version advertised in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LEN: usize = 32;

/// Protocol parameters for a single signing operation.
///
/// [`OAuthParameters::new`] stamps a fresh nonce and timestamp; values are never reused across
/// requests. Fixing both (see [`OAuthParameters::with_nonce`] and
/// [`OAuthParameters::with_timestamp`]) makes the resulting signature reproducible.
#[derive(Clone)]
pub struct OAuthParameters {
	/// `oauth_consumer_key`.
	pub consumer_key: String,
	/// `oauth_token` (temporary or access token), absent on temporary-token requests.
	pub token: Option<String>,
	/// `oauth_callback`, sent only on temporary-token requests.
	pub callback: Option<String>,
	/// `oauth_verifier`, sent only on access-token exchanges.
	pub verifier: Option<String>,
	/// `oauth_signature_method`.
	pub signature_method: SignatureMethod,
	/// `oauth_timestamp` in seconds since the Unix epoch.
	pub timestamp: i64,
	/// `oauth_nonce`.
	pub nonce: String,
	/// `oauth_signature`, populated by [`OAuthParameters::sign`].
	pub signature: Option<String>,
}
impl OAuthParameters {
	/// Creates unsigned parameters with a fresh nonce and the current timestamp.
	pub fn new(consumer_key: impl Into<String>, signature_method: SignatureMethod) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			token: None,
			callback: None,
			verifier: None,
			signature_method,
			timestamp: OffsetDateTime::now_utc().unix_timestamp(),
			nonce: generate_nonce(),
			signature: None,
		}
	}

	/// Sets `oauth_token`.
	pub fn with_token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(token.into());

		self
	}

	/// Sets `oauth_callback`.
	pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
		self.callback = Some(callback.into());

		self
	}

	/// Sets `oauth_verifier`.
	pub fn with_verifier(mut self, verifier: impl Into<String>) -> Self {
		self.verifier = Some(verifier.into());

		self
	}

	/// Overrides the generated nonce.
	pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
		self.nonce = nonce.into();

		self
	}

	/// Overrides the generated timestamp.
	pub fn with_timestamp(mut self, timestamp: i64) -> Self {
		self.timestamp = timestamp;

		self
	}

	/// Returns every `oauth_*` pair except `oauth_signature`.
	pub fn unsigned_pairs(&self) -> Vec<(String, String)> {
		let mut pairs = Vec::with_capacity(8);

		if let Some(callback) = &self.callback {
			pairs.push(("oauth_callback".into(), callback.clone()));
		}

		pairs.push(("oauth_consumer_key".into(), self.consumer_key.clone()));

		if let Some(token) = &self.token {
			pairs.push(("oauth_token".into(), token.clone()));
		}
		if let Some(verifier) = &self.verifier {
			pairs.push(("oauth_verifier".into(), verifier.clone()));
		}

		pairs.push(("oauth_signature_method".into(), self.signature_method.as_str().into()));
		pairs.push(("oauth_timestamp".into(), self.timestamp.to_string()));
		pairs.push(("oauth_nonce".into(), self.nonce.clone()));
		pairs.push(("oauth_version".into(), OAUTH_VERSION.into()));

		pairs
	}

	/// Computes `oauth_signature` over `method`, `url` (including its query) and the form
	/// parameters in `params`.
	///
	/// `mode` must produce the same method recorded in `signature_method`.
	pub fn sign(
		mut self,
		method: &str,
		url: &Url,
		params: &[(String, String)],
		mode: &SigningMode,
		token_secret: &TokenSecret,
	) -> Result<Self, SignatureError> {
		self.signature_method = mode.method();

		let mut all = self.unsigned_pairs();

		all.extend(params.iter().cloned());

		let base = base_string(method, url, &all)?;

		self.signature = Some(mode.sign(&base, token_secret)?);

		Ok(self)
	}

	/// Renders the `Authorization` header value (`OAuth k="v", ...`).
	pub fn authorization_header(&self) -> String {
		let mut fields = Vec::with_capacity(9);

		if let Some(callback) = &self.callback {
			fields.push(("oauth_callback", callback.as_str()));
		}

		fields.push(("oauth_consumer_key", self.consumer_key.as_str()));

		if let Some(token) = &self.token {
			fields.push(("oauth_token", token.as_str()));
		}
		if let Some(verifier) = &self.verifier {
			fields.push(("oauth_verifier", verifier.as_str()));
		}

		fields.push(("oauth_signature_method", self.signature_method.as_str()));

		if let Some(signature) = &self.signature {
			fields.push(("oauth_signature", signature.as_str()));
		}

		let timestamp = self.timestamp.to_string();

		fields.push(("oauth_timestamp", timestamp.as_str()));
		fields.push(("oauth_nonce", self.nonce.as_str()));
		fields.push(("oauth_version", OAUTH_VERSION));

		let rendered = fields
			.into_iter()
			.map(|(key, value)| format!("{key}=\"{}\"", percent_encode(value)))
			.collect::<Vec<_>>()
			.join(", ");

		format!("OAuth {rendered}")
	}
}
impl Debug for OAuthParameters {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthParameters")
			.field("consumer_key", &self.consumer_key)
			.field("token_set", &self.token.is_some())
			.field("callback", &self.callback)
			.field("verifier_set", &self.verifier.is_some())
			.field("signature_method", &self.signature_method)
			.field("timestamp", &self.timestamp)
			.field("nonce", &self.nonce)
			.field("signed", &self.signature.is_some())
			.finish()
	}
}

/// Parses an `Authorization: OAuth ...` header back into its decoded fields.
pub fn parse_authorization_header(header: &str) -> Option<BTreeMap<String, String>> {
	let fields = header.strip_prefix("OAuth ")?;
	let mut parsed = BTreeMap::new();

	for field in fields.split(',') {
		let (key, quoted) = field.trim().split_once('=')?;
		let value = quoted.strip_prefix('"')?.strip_suffix('"')?;
		let decoded = urlencoding::decode(value).ok()?;

		parsed.insert(key.to_owned(), decoded.into_owned());
	}

	Some(parsed)
}

fn generate_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn fixed() -> OAuthParameters {
		OAuthParameters::new("dpf43f3p2l4k3l03", SignatureMethod::HmacSha1)
			.with_token("nnch734d00sl2jdk")
			.with_nonce("kllo9940pd9333jh")
			.with_timestamp(1_191_242_096)
	}

	fn photos() -> Url {
		Url::parse("http://photos.example.net/photos?file=vacation.jpg&size=original")
			.expect("Photos URL should parse.")
	}

	#[test]
	fn fixed_parameters_reproduce_the_known_signature() {
		let signed = fixed()
			.sign(
				"GET",
				&photos(),
				&[],
				&SigningMode::hmac("kd94hf93k423kf44"),
				&TokenSecret::new("pfkkdhi9sl3r4s00"),
			)
			.expect("Signing should succeed.");

		assert_eq!(signed.signature.as_deref(), Some("tR3+Ty81lMeYAr/Fid0kMTYa/WM="));
		assert_eq!(
			signed.authorization_header(),
			"OAuth oauth_consumer_key=\"dpf43f3p2l4k3l03\", oauth_token=\"nnch734d00sl2jdk\", \
			 oauth_signature_method=\"HMAC-SHA1\", oauth_signature=\"tR3%2BTy81lMeYAr%2FFid0kMTYa%2FWM%3D\", \
			 oauth_timestamp=\"1191242096\", oauth_nonce=\"kllo9940pd9333jh\", oauth_version=\"1.0\""
		);
	}

	#[test]
	fn fresh_parameters_never_share_a_nonce() {
		let a = OAuthParameters::new("key", SignatureMethod::HmacSha1);
		let b = OAuthParameters::new("key", SignatureMethod::HmacSha1);

		assert_ne!(a.nonce, b.nonce);
		assert_eq!(a.nonce.len(), NONCE_LEN);
		assert!(a.nonce.chars().all(|c| c.is_ascii_alphanumeric()));
		assert!(a.timestamp > 1_600_000_000);
	}

	#[test]
	fn header_round_trips_through_the_parser() {
		let signed = fixed()
			.with_callback("https://app.example.com/cb?state=a%3Db")
			.with_verifier("hfdp7dh39dks9884")
			.sign(
				"POST",
				&photos(),
				&[("status".into(), "hello world".into())],
				&SigningMode::hmac("kd94hf93k423kf44"),
				&TokenSecret::new("pfkkdhi9sl3r4s00"),
			)
			.expect("Signing should succeed.");
		let parsed = parse_authorization_header(&signed.authorization_header())
			.expect("Rendered header should parse.");

		assert_eq!(parsed["oauth_callback"], "https://app.example.com/cb?state=a%3Db");
		assert_eq!(parsed["oauth_verifier"], "hfdp7dh39dks9884");
		assert_eq!(parsed["oauth_signature"], signed.signature.clone().unwrap_or_default());
		assert!(!parsed.contains_key("status"), "Form parameters stay out of the header.");
	}

	#[test]
	fn form_parameters_change_the_signature() {
		let mode = SigningMode::hmac("kd94hf93k423kf44");
		let secret = TokenSecret::new("pfkkdhi9sl3r4s00");
		let bare = fixed().sign("POST", &photos(), &[], &mode, &secret).expect("Signing works.");
		let with_form = fixed()
			.sign("POST", &photos(), &[("a".into(), "1".into())], &mode, &secret)
			.expect("Signing works.");

		assert_ne!(bare.signature, with_form.signature);
	}
}
