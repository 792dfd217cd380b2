//! Signing modes (HMAC-SHA1 and RSA-SHA1) and their key material.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use rsa::{
	RsaPrivateKey,
	pkcs1v15::SigningKey,
	pkcs8::DecodePrivateKey,
	signature::{SignatureEncoding, Signer},
};
use sha1::Sha1;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, SignatureError},
	signer::encode::percent_encode,
};

/// `oauth_signature_method` values supported by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
	/// `HMAC-SHA1`, keyed by the consumer secret and token secret.
	#[serde(rename = "HMAC-SHA1")]
	HmacSha1,
	/// `RSA-SHA1`, keyed by the consumer's RSA private key.
	#[serde(rename = "RSA-SHA1")]
	RsaSha1,
}
impl SignatureMethod {
	/// Returns the wire identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
			SignatureMethod::RsaSha1 => "RSA-SHA1",
		}
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Key material for exactly one signature method.
#[derive(Clone)]
pub enum SigningMode {
	/// HMAC-SHA1 with the consumer secret; the token secret is supplied per request.
	Hmac {
		/// Consumer (client) secret.
		consumer_secret: TokenSecret,
	},
	/// RSA-SHA1 (PKCS#1 v1.5) with the consumer's private key; token secrets are unused.
	Rsa {
		/// Prepared PKCS#1 v1.5 signing key.
		key: Arc<SigningKey<Sha1>>,
	},
}
impl SigningMode {
	/// Builds an HMAC-SHA1 mode keyed by `consumer_secret`.
	pub fn hmac(consumer_secret: impl Into<TokenSecret>) -> Self {
		Self::Hmac { consumer_secret: consumer_secret.into() }
	}

	/// Builds an RSA-SHA1 mode from an already decoded private key.
	pub fn rsa(private_key: RsaPrivateKey) -> Self {
		Self::Rsa { key: Arc::new(SigningKey::<Sha1>::new(private_key)) }
	}

	/// Decodes a Base64 PKCS#8 DER private key, tolerating embedded whitespace and line breaks.
	pub fn rsa_from_base64_pkcs8(encoded: &str) -> Result<Self, ConfigError> {
		let compact = encoded.chars().filter(|c| !c.is_whitespace()).collect::<String>();
		let der = STANDARD.decode(compact).map_err(ConfigError::invalid_private_key)?;
		let private_key =
			RsaPrivateKey::from_pkcs8_der(&der).map_err(ConfigError::invalid_private_key)?;

		Ok(Self::rsa(private_key))
	}

	/// Returns the `oauth_signature_method` this mode produces.
	pub fn method(&self) -> SignatureMethod {
		match self {
			Self::Hmac { .. } => SignatureMethod::HmacSha1,
			Self::Rsa { .. } => SignatureMethod::RsaSha1,
		}
	}

	/// Signs `base_string` and returns the Base64 signature.
	pub fn sign(
		&self,
		base_string: &str,
		token_secret: &TokenSecret,
	) -> Result<String, SignatureError> {
		match self {
			Self::Hmac { consumer_secret } => {
				let key = format!(
					"{}&{}",
					percent_encode(consumer_secret.expose()),
					percent_encode(token_secret.expose())
				);
				let mut mac = <Hmac<Sha1>>::new_from_slice(key.as_bytes())
					.map_err(|_| SignatureError::HmacKey)?;

				mac.update(base_string.as_bytes());

				Ok(STANDARD.encode(mac.finalize().into_bytes()))
			},
			Self::Rsa { key } => {
				let signature = key
					.try_sign(base_string.as_bytes())
					.map_err(|e| SignatureError::Rsa { message: e.to_string() })?;

				Ok(STANDARD.encode(signature.to_bytes()))
			},
		}
	}
}
impl Debug for SigningMode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Hmac { .. } => f.write_str("SigningMode::Hmac(<redacted>)"),
			Self::Rsa { .. } => f.write_str("SigningMode::Rsa(<redacted>)"),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use rsa::{
		pkcs1v15::{Signature, VerifyingKey},
		signature::Verifier,
	};
	// self
	use super::*;
	use crate::_preludet::TEST_RSA_PRIVATE_KEY;

	const RFC_HMAC_BASE: &str = "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg\
		%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh\
		%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096\
		%26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal";
	const RSA_BASE: &str = "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg\
		%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh\
		%26oauth_signature_method%3DRSA-SHA1%26oauth_timestamp%3D1191242096\
		%26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal";

	#[test]
	fn hmac_matches_known_vector() {
		let mode = SigningMode::hmac("kd94hf93k423kf44");
		let signature = mode
			.sign(RFC_HMAC_BASE, &TokenSecret::new("pfkkdhi9sl3r4s00"))
			.expect("HMAC signing should succeed.");

		assert_eq!(signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
		assert_eq!(mode.method(), SignatureMethod::HmacSha1);
	}

	#[test]
	fn hmac_is_deterministic_and_depends_on_token_secret() {
		let mode = SigningMode::hmac("consumer");
		let first = mode.sign("base", &TokenSecret::new("a")).expect("Signing should succeed.");
		let second = mode.sign("base", &TokenSecret::new("a")).expect("Signing should succeed.");
		let other = mode.sign("base", &TokenSecret::new("b")).expect("Signing should succeed.");
		let empty = mode.sign("base", &TokenSecret::default()).expect("Signing should succeed.");

		assert_eq!(first, second);
		assert_ne!(first, other);
		assert_ne!(first, empty);
	}

	#[test]
	fn rsa_matches_known_vector_and_verifies() {
		let mode = SigningMode::rsa_from_base64_pkcs8(TEST_RSA_PRIVATE_KEY)
			.expect("Test private key should decode.");
		let signature = mode
			.sign(RSA_BASE, &TokenSecret::new("ignored-by-rsa"))
			.expect("RSA signing should succeed.");

		assert_eq!(mode.method(), SignatureMethod::RsaSha1);
		assert_eq!(
			signature,
			"Wdg5aRnmYIq2DtpUXnf+65uBNtSswWs2ot2mnngFn5o9uldsBxw7TqQlzt/MKN0dGzA4ULbvLTIatZRZzUqw\
			 58lBOnqjhHMABP+MfU/mLd9zZFX4VyObmBh6fY+Gl/6b7bOzCji+IldgsQqHtsiv1y9R4afdFS9P8x2JnxqAsCE="
		);

		let der = STANDARD.decode(TEST_RSA_PRIVATE_KEY).expect("Test key should be valid Base64.");
		let private_key =
			RsaPrivateKey::from_pkcs8_der(&der).expect("Test key should be valid PKCS#8.");
		let verifying_key = VerifyingKey::<Sha1>::new(private_key.to_public_key());
		let raw = STANDARD.decode(&signature).expect("Signature should be valid Base64.");
		let parsed = Signature::try_from(raw.as_slice()).expect("Signature bytes should parse.");

		verifying_key
			.verify(RSA_BASE.as_bytes(), &parsed)
			.expect("Signature should verify with the public key.");
	}

	#[test]
	fn rsa_key_decoding_tolerates_line_breaks() {
		let wrapped = TEST_RSA_PRIVATE_KEY
			.as_bytes()
			.chunks(64)
			.map(|chunk| String::from_utf8_lossy(chunk).into_owned())
			.collect::<Vec<_>>()
			.join("\n");

		assert!(SigningMode::rsa_from_base64_pkcs8(&wrapped).is_ok());
	}

	#[test]
	fn malformed_private_keys_fail_eagerly() {
		assert!(matches!(
			SigningMode::rsa_from_base64_pkcs8("not base64!"),
			Err(ConfigError::InvalidPrivateKey { .. })
		));
		assert!(matches!(
			SigningMode::rsa_from_base64_pkcs8("bm90IGEga2V5"),
			Err(ConfigError::InvalidPrivateKey { .. })
		));
	}

	#[test]
	fn debug_output_redacts_key_material() {
		assert_eq!(format!("{:?}", SigningMode::hmac("s3cr3t")), "SigningMode::Hmac(<redacted>)");
	}
}
