#![no_main]

use arbitrary::Arbitrary;
use jwks_manager::JsonWebKey;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct JwkFuzzInput {
    document: String,
}

fuzz_target!(|input: JwkFuzzInput| {
    // Any JSON that parses as a JWK must decode or fail cleanly,
    // never panic
    if let Ok(jwk) = serde_json::from_str::<JsonWebKey>(&input.document) {
        let _ = jwk.decode();
        let _ = jwk.decode_public();
        let _ = jwk.thumbprint();
        let public = jwk.to_public();
        assert!(!public.has_private_components());
    }
});
