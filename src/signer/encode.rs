//! Percent encoding, parameter normalization, and base string construction (RFC 5849 §3.4.1).

// std
use std::borrow::Cow;
// self
use crate::{_prelude::*, error::SignatureError};

/// Percent-encodes `value` with the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`).
pub fn percent_encode(value: &str) -> Cow<'_, str> {
	urlencoding::encode(value)
}

/// Encodes, sorts, and `&`-joins request parameters into the normalized parameter string.
///
/// Pairs are sorted by encoded name and then by encoded value, so repeated names keep a
/// deterministic order.
pub fn normalize_parameters<'a, I>(params: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut encoded = params
		.into_iter()
		.map(|(key, value)| (percent_encode(key).into_owned(), percent_encode(value).into_owned()))
		.collect::<Vec<_>>();

	encoded.sort();

	let mut buf = String::new();

	for (idx, (key, value)) in encoded.iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(key);
		buf.push('=');
		buf.push_str(value);
	}

	buf
}

/// Builds the base string URI: lowercase scheme and host, non-default port, path; no query or
/// fragment.
pub fn base_string_uri(url: &Url) -> Result<String, SignatureError> {
	let host =
		url.host_str().ok_or_else(|| SignatureError::UnsupportedUrl { url: url.to_string() })?;
	let mut uri = format!("{}://{}", url.scheme(), host.to_ascii_lowercase());

	if let Some(port) = url.port() {
		uri.push(':');
		uri.push_str(&port.to_string());
	}

	uri.push_str(url.path());

	Ok(uri)
}

/// Builds the signature base string for `method` and `url`.
///
/// `params` carries the `oauth_*` protocol parameters plus any form-encoded body parameters;
/// query parameters are read from `url` itself. `oauth_signature` is never included.
pub fn base_string(
	method: &str,
	url: &Url,
	params: &[(String, String)],
) -> Result<String, SignatureError> {
	let uri = base_string_uri(url)?;
	let query = url.query_pairs().collect::<Vec<_>>();
	let normalized = normalize_parameters(
		query
			.iter()
			.map(|(key, value)| (key.as_ref(), value.as_ref()))
			.chain(params.iter().map(|(key, value)| (key.as_str(), value.as_str())))
			.filter(|(key, _)| *key != "oauth_signature"),
	);

	Ok(format!(
		"{}&{}&{}",
		method.to_ascii_uppercase(),
		percent_encode(&uri),
		percent_encode(&normalized)
	))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Test URL should parse.")
	}

	#[test]
	fn encoding_keeps_only_unreserved_characters() {
		assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
		assert_eq!(percent_encode("An encoded string!"), "An%20encoded%20string%21");
		assert_eq!(percent_encode("Dogs, Cats & Mice"), "Dogs%2C%20Cats%20%26%20Mice");
		assert_eq!(percent_encode("☃"), "%E2%98%83");
		assert_eq!(percent_encode("a-b.c_d~e"), "a-b.c_d~e");
	}

	#[test]
	fn normalization_sorts_by_encoded_name_then_value() {
		let params = [
			("b5", "=%3D"),
			("a3", "a"),
			("c@", ""),
			("a2", "r b"),
			("oauth_consumer_key", "9djdj82h48djs9d2"),
			("oauth_token", "kkk9d7dh3k39sjv7"),
			("oauth_signature_method", "HMAC-SHA1"),
			("oauth_timestamp", "137131201"),
			("oauth_nonce", "7d8f3e4a"),
			("c2", ""),
			("a3", "2 q"),
		];

		assert_eq!(
			normalize_parameters(params),
			"a2=r%20b&a3=2%20q&a3=a&b5=%3D%253D&c%40=&c2=&oauth_consumer_key=9djdj82h48djs9d2\
			 &oauth_nonce=7d8f3e4a&oauth_signature_method=HMAC-SHA1&oauth_timestamp=137131201\
			 &oauth_token=kkk9d7dh3k39sjv7"
		);
	}

	#[test]
	fn base_string_uri_drops_default_port_query_and_fragment() {
		assert_eq!(
			base_string_uri(&url("HTTP://EXAMPLE.COM:80/r%20v/X?id=123"))
				.expect("Base string URI should build."),
			"http://example.com/r%20v/X"
		);
		assert_eq!(
			base_string_uri(&url("https://www.example.net:8080/?q=1#frag"))
				.expect("Base string URI should build."),
			"https://www.example.net:8080/"
		);
	}

	#[test]
	fn base_string_merges_query_and_protocol_parameters() {
		let params = [
			("oauth_consumer_key", "dpf43f3p2l4k3l03"),
			("oauth_token", "nnch734d00sl2jdk"),
			("oauth_signature_method", "HMAC-SHA1"),
			("oauth_signature", "ignored"),
			("oauth_timestamp", "1191242096"),
			("oauth_nonce", "kllo9940pd9333jh"),
			("oauth_version", "1.0"),
		]
		.map(|(key, value)| (key.to_owned(), value.to_owned()));
		let base = base_string(
			"get",
			&url("http://photos.example.net/photos?file=vacation.jpg&size=original"),
			&params,
		)
		.expect("Base string should build.");

		assert_eq!(
			base,
			"GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg\
			 %26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh\
			 %26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096\
			 %26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
		);
	}
}
