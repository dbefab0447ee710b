/*!
 * JWK encoding and decoding for RSA and P-256 key material
 *
 * Every numeric component is base64url without padding. Absent components
 * are omitted from the JSON form, never written as null. The RSA private
 * components d, p, q, dp, dq and qi travel as a unit: a key is either
 * fully private or public only.
 */

use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::algorithm::{KeyType, SigningAlgorithm};
use crate::error::{KeyError, KeyResult};
use crate::keygen::{SigningKeyPair, SigningPublicKey};

/// A single JSON Web Key, private components included when present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key type, `RSA` or `EC`
    pub kty: KeyType,
    /// Key identifier published alongside the key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Intended key use, `sig` for every key this crate produces
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// Signing algorithm the key serves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<SigningAlgorithm>,
    /// EC curve name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// EC public x coordinate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// EC public y coordinate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// RSA modulus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// Private exponent (RSA) or private scalar (EC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// RSA first prime factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    /// RSA second prime factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// RSA first CRT exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    /// RSA second CRT exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    /// RSA CRT coefficient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
}

impl Drop for JsonWebKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// Implement Zeroize manually instead of using the derive
impl Zeroize for JsonWebKey {
    fn zeroize(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.dp.zeroize();
        self.dq.zeroize();
        self.qi.zeroize();
        // The public components are not sensitive
    }
}

impl JsonWebKey {
    fn bare(kty: KeyType) -> Self {
        JsonWebKey {
            kty,
            kid: None,
            key_use: None,
            alg: None,
            crv: None,
            x: None,
            y: None,
            n: None,
            e: None,
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
        }
    }

    /// Serialize a key pair into its private JWK form
    ///
    /// The result carries the full private component set, `use` set to
    /// `sig`, the algorithm name and a kid derived from the public
    /// components (RFC 7638 thumbprint).
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeyFormat` if the key material cannot
    /// serve the requested algorithm.
    pub fn encode(key: &SigningKeyPair, algorithm: SigningAlgorithm) -> KeyResult<Self> {
        if key.key_type() != algorithm.key_type() {
            return Err(KeyError::invalid_format(
                "key material",
                &format!("{} key cannot serve {}", key.key_type(), algorithm),
            ));
        }
        let mut jwk = match key {
            SigningKeyPair::Rsa(private_key) => Self::encode_rsa(private_key)?,
            SigningKeyPair::EllipticCurve(secret_key) => {
                Self::encode_ec(secret_key, algorithm)?
            }
        };
        jwk.key_use = Some("sig".to_string());
        jwk.alg = Some(algorithm);
        jwk.kid = Some(jwk.thumbprint()?);
        Ok(jwk)
    }

    fn encode_rsa(private_key: &RsaPrivateKey) -> KeyResult<Self> {
        let mut key = private_key.clone();
        key.precompute()
            .map_err(|e| KeyError::invalid_format("rsa key material", &e.to_string()))?;

        let primes = key.primes();
        if primes.len() != 2 {
            return Err(KeyError::invalid_format(
                "rsa key material",
                &format!("expected 2 prime factors, found {}", primes.len()),
            ));
        }
        let p = primes[0].clone();
        let q = primes[1].clone();
        let dp = key
            .dp()
            .ok_or_else(|| KeyError::invalid_format("rsa key material", "missing dp"))?;
        let dq = key
            .dq()
            .ok_or_else(|| KeyError::invalid_format("rsa key material", "missing dq"))?;
        // qinv lives in a signed representation; its canonical value is
        // non-negative, so only the sign-padding byte has to go
        let qi = key
            .qinv()
            .ok_or_else(|| KeyError::invalid_format("rsa key material", "missing qi"))?
            .to_signed_bytes_be();

        let mut jwk = Self::bare(KeyType::Rsa);
        jwk.n = Some(encode_component(&key.n().to_bytes_be()));
        jwk.e = Some(encode_component(&key.e().to_bytes_be()));
        jwk.d = Some(encode_component(&key.d().to_bytes_be()));
        jwk.p = Some(encode_component(&p.to_bytes_be()));
        jwk.q = Some(encode_component(&q.to_bytes_be()));
        jwk.dp = Some(encode_component(&dp.to_bytes_be()));
        jwk.dq = Some(encode_component(&dq.to_bytes_be()));
        jwk.qi = Some(encode_component(&strip_sign_padding(qi)));
        Ok(jwk)
    }

    fn encode_ec(secret_key: &p256::SecretKey, algorithm: SigningAlgorithm) -> KeyResult<Self> {
        use p256::elliptic_curve::sec1::ToEncodedPoint;

        let curve = algorithm.curve().ok_or_else(|| {
            KeyError::invalid_format(
                "ec key material",
                &format!("{} does not name a curve", algorithm),
            )
        })?;
        let public_point = secret_key.public_key().to_encoded_point(false);
        let x = public_point
            .x()
            .ok_or_else(|| KeyError::invalid_format("ec key material", "missing x coordinate"))?;
        let y = public_point
            .y()
            .ok_or_else(|| KeyError::invalid_format("ec key material", "missing y coordinate"))?;

        let mut jwk = Self::bare(KeyType::EllipticCurve);
        jwk.crv = Some(curve.to_string());
        jwk.x = Some(encode_component(x.as_slice()));
        jwk.y = Some(encode_component(y.as_slice()));
        jwk.d = Some(encode_component(&secret_key.to_bytes()));
        Ok(jwk)
    }

    /// Reconstruct the private key pair this JWK serializes
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeyFormat` when required components are
    /// absent, the private set is partial, the curve is not recognized,
    /// an encoding is malformed or the components are inconsistent.
    pub fn decode(&self) -> KeyResult<SigningKeyPair> {
        match self.kty {
            KeyType::Rsa => self.decode_rsa(),
            KeyType::EllipticCurve => self.decode_ec(),
        }
    }

    fn decode_rsa(&self) -> KeyResult<SigningKeyPair> {
        let n = required_component("n", &self.n)?;
        let e = required_component("e", &self.e)?;

        let private = [&self.d, &self.p, &self.q, &self.dp, &self.dq, &self.qi];
        let present = private.iter().filter(|c| c.is_some()).count();
        if present == 0 {
            return Err(KeyError::invalid_format(
                "rsa private components",
                "absent, only the public half can be decoded",
            ));
        }
        if present != private.len() {
            return Err(KeyError::invalid_format(
                "rsa private components",
                "partial set, all of d, p, q, dp, dq and qi are required",
            ));
        }

        let d = required_component("d", &self.d)?;
        let p = required_component("p", &self.p)?;
        let q = required_component("q", &self.q)?;
        // The CRT values are recomputed from the factors, but malformed
        // encodings still fail the key
        for (name, value) in [("dp", &self.dp), ("dq", &self.dq), ("qi", &self.qi)] {
            if let Some(value) = value {
                decode_component(name, value)?;
            }
        }

        let key = RsaPrivateKey::from_components(
            BigUint::from_bytes_be(&n),
            BigUint::from_bytes_be(&e),
            BigUint::from_bytes_be(&d),
            vec![BigUint::from_bytes_be(&p), BigUint::from_bytes_be(&q)],
        )
        .map_err(|e| KeyError::invalid_format("rsa key material", &e.to_string()))?;
        Ok(SigningKeyPair::Rsa(key))
    }

    fn decode_ec(&self) -> KeyResult<SigningKeyPair> {
        let public_key = self.decode_ec_point()?;
        let d = required_component("d", &self.d)?;
        let d: [u8; 32] = d
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::invalid_format("d", "scalar must be 32 bytes for P-256"))?;
        let secret_key = p256::SecretKey::from_bytes(&p256::FieldBytes::from(d))
            .map_err(|_| KeyError::invalid_format("d", "scalar out of range for P-256"))?;
        if secret_key.public_key() != public_key {
            return Err(KeyError::invalid_format(
                "ec key material",
                "public coordinates do not match the private scalar",
            ));
        }
        Ok(SigningKeyPair::EllipticCurve(secret_key))
    }

    /// Reconstruct only the public half this JWK serializes
    ///
    /// Accepts both private and public-only forms.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeyFormat` when required public
    /// components are absent or malformed, or the curve is not
    /// recognized.
    pub fn decode_public(&self) -> KeyResult<SigningPublicKey> {
        match self.kty {
            KeyType::Rsa => {
                let n = required_component("n", &self.n)?;
                let e = required_component("e", &self.e)?;
                let key = RsaPublicKey::new(BigUint::from_bytes_be(&n), BigUint::from_bytes_be(&e))
                    .map_err(|e| KeyError::invalid_format("rsa key material", &e.to_string()))?;
                Ok(SigningPublicKey::Rsa(key))
            }
            KeyType::EllipticCurve => Ok(SigningPublicKey::EllipticCurve(self.decode_ec_point()?)),
        }
    }

    fn decode_ec_point(&self) -> KeyResult<p256::PublicKey> {
        let curve = self
            .crv
            .as_deref()
            .ok_or_else(|| KeyError::invalid_format("crv", "required component absent"))?;
        if curve != "P-256" {
            return Err(KeyError::invalid_format(
                "crv",
                &format!("unsupported curve '{}'", curve),
            ));
        }
        let x = required_component("x", &self.x)?;
        let y = required_component("y", &self.y)?;
        if x.len() != 32 || y.len() != 32 {
            return Err(KeyError::invalid_format(
                "ec key material",
                "coordinates must be 32 bytes for P-256",
            ));
        }
        // Uncompressed SEC1 form: 0x04 || x || y
        let mut sec1 = Vec::with_capacity(1 + x.len() + y.len());
        sec1.push(0x04);
        sec1.extend_from_slice(&x);
        sec1.extend_from_slice(&y);
        p256::PublicKey::from_sec1_bytes(&sec1)
            .map_err(|_| KeyError::invalid_format("ec key material", "not a point on P-256"))
    }

    /// Get the public projection of this key, private components stripped
    pub fn to_public(&self) -> JsonWebKey {
        let mut public = self.clone();
        public.zeroize();
        public
    }

    /// True if this JWK carries any private component
    pub fn has_private_components(&self) -> bool {
        self.d.is_some()
            || self.p.is_some()
            || self.q.is_some()
            || self.dp.is_some()
            || self.dq.is_some()
            || self.qi.is_some()
    }

    /// Compute the RFC 7638 thumbprint of this key
    ///
    /// The thumbprint hashes the canonical JSON of the required public
    /// members with SHA-256 and is used as the published kid.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::InvalidKeyFormat` if a required public member
    /// is absent.
    pub fn thumbprint(&self) -> KeyResult<String> {
        let canonical = match self.kty {
            KeyType::Rsa => {
                let n = self.require_member("n", &self.n)?;
                let e = self.require_member("e", &self.e)?;
                serde_json::json!({ "e": e, "kty": "RSA", "n": n })
            }
            KeyType::EllipticCurve => {
                let crv = self.require_member("crv", &self.crv)?;
                let x = self.require_member("x", &self.x)?;
                let y = self.require_member("y", &self.y)?;
                serde_json::json!({ "crv": crv, "kty": "EC", "x": x, "y": y })
            }
        };
        let canonical_json = serde_json::to_string(&canonical)?;
        let mut hasher = Sha256::new();
        hasher.update(canonical_json.as_bytes());
        Ok(encode_component(&hasher.finalize()))
    }

    fn require_member<'a>(&self, name: &str, value: &'a Option<String>) -> KeyResult<&'a str> {
        value
            .as_deref()
            .ok_or_else(|| KeyError::invalid_format(name, "required component absent"))
    }
}

/// Public key set served to verifiers (RFC 7517 key set document)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Assemble the public key set for the given keys
    ///
    /// Every key is projected through [`JsonWebKey::to_public`], so the
    /// result never carries private components.
    pub fn from_keys<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a JsonWebKey>,
    {
        JsonWebKeySet {
            keys: keys.into_iter().map(JsonWebKey::to_public).collect(),
        }
    }

    /// Find a key by its kid
    pub fn find(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|key| key.kid.as_deref() == Some(kid))
    }
}

fn encode_component(bytes: &[u8]) -> String {
    base64::encode_config(bytes, base64::URL_SAFE_NO_PAD)
}

fn decode_component(name: &str, value: &str) -> KeyResult<Vec<u8>> {
    base64::decode_config(value, base64::URL_SAFE_NO_PAD)
        .map_err(|e| KeyError::invalid_format(name, &e.to_string()))
}

fn required_component(name: &str, value: &Option<String>) -> KeyResult<Vec<u8>> {
    match value {
        Some(value) => decode_component(name, value),
        None => Err(KeyError::invalid_format(name, "required component absent")),
    }
}

fn strip_sign_padding(mut bytes: Vec<u8>) -> Vec<u8> {
    while bytes.len() > 1 && bytes[0] == 0 {
        bytes.remove(0);
    }
    bytes
}
