use std::marker::PhantomData;

use prims_crypto::{Bls, SignatureScheme};
use prims_types::to_hex;
use serde::{Deserialize, Serialize};

use crate::args;
use crate::config::DispatchConfig;
use crate::error::DispatchResult;
use crate::operation::Operation;

use super::{NoArgs, Validity};

/// Name and description of one scheme-generic operation.
#[derive(Clone, Copy, Debug)]
pub struct Label {
    pub name: &'static str,
    pub description: &'static str,
}

// ---------------------------------------------------------------------------
// Keygen
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeygenOutput {
    pub private_key: String,
    pub public_key: String,
    pub algorithm: &'static str,
}

/// `<scheme>_keygen`: fresh key pair, hex encoded.
pub struct KeygenOp<S> {
    label: Label,
    scheme: PhantomData<fn() -> S>,
}

impl<S> KeygenOp<S> {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            scheme: PhantomData,
        }
    }
}

impl<S: SignatureScheme> Operation for KeygenOp<S> {
    type Args = NoArgs;
    type Input = ();
    type Output = KeygenOutput;

    fn name(&self) -> &'static str {
        self.label.name
    }

    fn description(&self) -> &'static str {
        self.label.description
    }

    fn validate(&self, _args: NoArgs, _limits: &DispatchConfig) -> DispatchResult<()> {
        Ok(())
    }

    fn execute(&self, _input: ()) -> DispatchResult<KeygenOutput> {
        let keypair = S::generate_keypair()?;
        Ok(KeygenOutput {
            private_key: keypair.private_key_hex(),
            public_key: keypair.public_key_hex(),
            algorithm: S::NAME,
        })
    }
}

// ---------------------------------------------------------------------------
// Sign
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignArgs {
    pub message: String,
    pub private_key: String,
    pub encoding: Option<String>,
}

pub struct SignInput {
    message: Vec<u8>,
    private_key: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct SignOutput {
    pub signature: String,
}

/// `<scheme>_sign`: sign a payload with a hex private key.
pub struct SignOp<S> {
    label: Label,
    scheme: PhantomData<fn() -> S>,
}

impl<S> SignOp<S> {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            scheme: PhantomData,
        }
    }
}

impl<S: SignatureScheme> Operation for SignOp<S> {
    type Args = SignArgs;
    type Input = SignInput;
    type Output = SignOutput;

    fn name(&self) -> &'static str {
        self.label.name
    }

    fn description(&self) -> &'static str {
        self.label.description
    }

    fn validate(&self, args: SignArgs, _limits: &DispatchConfig) -> DispatchResult<SignInput> {
        Ok(SignInput {
            message: args::encoding(args.encoding.as_deref())?.decode(&args.message)?,
            private_key: args::hex_bytes(&args.private_key)?,
        })
    }

    fn execute(&self, input: SignInput) -> DispatchResult<SignOutput> {
        let signature = S::sign(&input.message, &input.private_key)?;
        Ok(SignOutput {
            signature: to_hex(signature),
        })
    }
}

// ---------------------------------------------------------------------------
// Verify
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyArgs {
    pub message: String,
    pub signature: String,
    pub public_key: String,
    pub encoding: Option<String>,
}

pub struct VerifyInput {
    message: Vec<u8>,
    signature: Vec<u8>,
    public_key: Vec<u8>,
}

/// `<scheme>_verify`: check a hex signature against a hex public key.
pub struct VerifyOp<S> {
    label: Label,
    scheme: PhantomData<fn() -> S>,
}

impl<S> VerifyOp<S> {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            scheme: PhantomData,
        }
    }
}

impl<S: SignatureScheme> Operation for VerifyOp<S> {
    type Args = VerifyArgs;
    type Input = VerifyInput;
    type Output = Validity;

    fn name(&self) -> &'static str {
        self.label.name
    }

    fn description(&self) -> &'static str {
        self.label.description
    }

    fn validate(&self, args: VerifyArgs, _limits: &DispatchConfig) -> DispatchResult<VerifyInput> {
        Ok(VerifyInput {
            message: args::encoding(args.encoding.as_deref())?.decode(&args.message)?,
            signature: args::hex_bytes(&args.signature)?,
            public_key: args::hex_bytes(&args.public_key)?,
        })
    }

    fn execute(&self, input: VerifyInput) -> DispatchResult<Validity> {
        Ok(Validity {
            valid: S::verify(&input.message, &input.signature, &input.public_key)?,
        })
    }
}

// ---------------------------------------------------------------------------
// BLS aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AggregateSignaturesArgs {
    pub signatures: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatePublicKeysArgs {
    pub public_keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AggregateOutput {
    pub aggregated: String,
    pub count: usize,
}

/// Decode a list of hex points, checking the list length before any decoding.
fn decode_all(
    what: &str,
    values: &[String],
    limits: &DispatchConfig,
) -> DispatchResult<Vec<Vec<u8>>> {
    args::check_limit(what, values.len(), limits.max_aggregate)?;
    values.iter().map(|v| args::hex_bytes(v)).collect()
}

/// `bls_aggregate_signatures`: sum signatures into one.
pub struct BlsAggregateSignaturesOp;

impl Operation for BlsAggregateSignaturesOp {
    type Args = AggregateSignaturesArgs;
    type Input = Vec<Vec<u8>>;
    type Output = AggregateOutput;

    fn name(&self) -> &'static str {
        "bls_aggregate_signatures"
    }

    fn description(&self) -> &'static str {
        "Aggregate BLS signatures over the same message"
    }

    fn validate(
        &self,
        args: AggregateSignaturesArgs,
        limits: &DispatchConfig,
    ) -> DispatchResult<Vec<Vec<u8>>> {
        decode_all("signatures", &args.signatures, limits)
    }

    fn execute(&self, signatures: Vec<Vec<u8>>) -> DispatchResult<AggregateOutput> {
        let aggregated = Bls::aggregate_signatures(&signatures)?;
        Ok(AggregateOutput {
            aggregated: to_hex(aggregated),
            count: signatures.len(),
        })
    }
}

/// `bls_aggregate_publickeys`: sum public keys into one.
pub struct BlsAggregatePublicKeysOp;

impl Operation for BlsAggregatePublicKeysOp {
    type Args = AggregatePublicKeysArgs;
    type Input = Vec<Vec<u8>>;
    type Output = AggregateOutput;

    fn name(&self) -> &'static str {
        "bls_aggregate_publickeys"
    }

    fn description(&self) -> &'static str {
        "Aggregate BLS public keys"
    }

    fn validate(
        &self,
        args: AggregatePublicKeysArgs,
        limits: &DispatchConfig,
    ) -> DispatchResult<Vec<Vec<u8>>> {
        decode_all("publicKeys", &args.public_keys, limits)
    }

    fn execute(&self, keys: Vec<Vec<u8>>) -> DispatchResult<AggregateOutput> {
        let aggregated = Bls::aggregate_public_keys(&keys)?;
        Ok(AggregateOutput {
            aggregated: to_hex(aggregated),
            count: keys.len(),
        })
    }
}
