use prims_crypto::{RandomError, SecureRandom};
use prims_types::to_hex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::args::{self, IntArg};
use crate::config::DispatchConfig;
use crate::error::DispatchResult;
use crate::operation::Operation;

use super::NoArgs;

const DEFAULT_RANDOM_BYTES: usize = 32;

/// Reject oversized arrays before any entropy is drawn.
fn checked_array(array: Vec<Value>, limits: &DispatchConfig) -> DispatchResult<Vec<Value>> {
    args::check_limit("array", array.len(), limits.max_sample_array)?;
    Ok(array)
}

// ---------------------------------------------------------------------------
// random_bytes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RandomBytesArgs {
    pub length: Option<IntArg>,
}

#[derive(Debug, Serialize)]
pub struct RandomBytesOutput {
    pub bytes: String,
    pub length: usize,
}

/// `random_bytes`: `length` bytes from the OS CSPRNG, 32 by default.
pub struct RandomBytesOp;

impl Operation for RandomBytesOp {
    type Args = RandomBytesArgs;
    type Input = usize;
    type Output = RandomBytesOutput;

    fn name(&self) -> &'static str {
        "random_bytes"
    }

    fn description(&self) -> &'static str {
        "Generate cryptographically secure random bytes (hex)"
    }

    fn validate(&self, args: RandomBytesArgs, limits: &DispatchConfig) -> DispatchResult<usize> {
        let length = match args.length {
            Some(length) => length.non_negative("length")?,
            None => DEFAULT_RANDOM_BYTES,
        };
        args::check_limit("length", length, limits.max_random_bytes)?;
        Ok(length)
    }

    fn execute(&self, length: usize) -> DispatchResult<RandomBytesOutput> {
        let bytes = SecureRandom::new().bytes(length)?;
        Ok(RandomBytesOutput {
            bytes: to_hex(bytes),
            length,
        })
    }
}

// ---------------------------------------------------------------------------
// random_int / random_int_range
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RandomIntArgs {
    pub max: IntArg,
}

#[derive(Debug, Serialize)]
pub struct RandomIntOutput<T> {
    pub value: T,
    pub range: String,
}

/// `random_int`: uniform integer in `[0, max)`.
pub struct RandomIntOp;

impl Operation for RandomIntOp {
    type Args = RandomIntArgs;
    type Input = u64;
    type Output = RandomIntOutput<u64>;

    fn name(&self) -> &'static str {
        "random_int"
    }

    fn description(&self) -> &'static str {
        "Uniform random integer in [0, max) by rejection sampling"
    }

    fn validate(&self, args: RandomIntArgs, _limits: &DispatchConfig) -> DispatchResult<u64> {
        args.max.positive_u64("max")
    }

    fn execute(&self, max: u64) -> DispatchResult<RandomIntOutput<u64>> {
        Ok(RandomIntOutput {
            value: SecureRandom::new().int(max)?,
            range: format!("[0, {max})"),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RandomIntRangeArgs {
    pub min: IntArg,
    pub max: IntArg,
}

/// `random_int_range`: uniform integer in `[min, max)`.
pub struct RandomIntRangeOp;

impl Operation for RandomIntRangeOp {
    type Args = RandomIntRangeArgs;
    type Input = (i64, i64);
    type Output = RandomIntOutput<i64>;

    fn name(&self) -> &'static str {
        "random_int_range"
    }

    fn description(&self) -> &'static str {
        "Uniform random integer in [min, max)"
    }

    fn validate(
        &self,
        args: RandomIntRangeArgs,
        _limits: &DispatchConfig,
    ) -> DispatchResult<(i64, i64)> {
        let min = args.min.signed("min")?;
        let max = args.max.signed("max")?;
        if min >= max {
            return Err(RandomError::EmptyRange { min, max }.into());
        }
        Ok((min, max))
    }

    fn execute(&self, (min, max): (i64, i64)) -> DispatchResult<RandomIntOutput<i64>> {
        Ok(RandomIntOutput {
            value: SecureRandom::new().int_range(min, max)?,
            range: format!("[{min}, {max})"),
        })
    }
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ArrayArgs {
    pub array: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOutput {
    pub selected: Value,
    pub array_length: usize,
}

/// `random_select`: one element, uniformly.
pub struct RandomSelectOp;

impl Operation for RandomSelectOp {
    type Args = ArrayArgs;
    type Input = Vec<Value>;
    type Output = SelectOutput;

    fn name(&self) -> &'static str {
        "random_select"
    }

    fn description(&self) -> &'static str {
        "Select one element of an array uniformly at random"
    }

    fn validate(&self, args: ArrayArgs, limits: &DispatchConfig) -> DispatchResult<Vec<Value>> {
        if args.array.is_empty() {
            return Err(RandomError::EmptyArray.into());
        }
        checked_array(args.array, limits)
    }

    fn execute(&self, array: Vec<Value>) -> DispatchResult<SelectOutput> {
        let selected = SecureRandom::new().select(&array)?.clone();
        Ok(SelectOutput {
            selected,
            array_length: array.len(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SampleArgs {
    pub array: Vec<Value>,
    pub k: IntArg,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleOutput {
    pub sample: Vec<Value>,
    pub sample_size: usize,
    pub array_length: usize,
}

/// `random_sample`: `k` distinct positions without replacement.
pub struct RandomSampleOp;

impl Operation for RandomSampleOp {
    type Args = SampleArgs;
    type Input = (Vec<Value>, usize);
    type Output = SampleOutput;

    fn name(&self) -> &'static str {
        "random_sample"
    }

    fn description(&self) -> &'static str {
        "Sample k distinct elements of an array without replacement"
    }

    fn validate(&self, args: SampleArgs, limits: &DispatchConfig) -> DispatchResult<Self::Input> {
        let k = args.k.non_negative("k")?;
        let array = checked_array(args.array, limits)?;
        if k > array.len() {
            return Err(RandomError::InvalidSampleSize {
                k,
                len: array.len(),
            }
            .into());
        }
        Ok((array, k))
    }

    fn execute(&self, (array, k): Self::Input) -> DispatchResult<SampleOutput> {
        let sample = SecureRandom::new().sample(&array, k)?;
        Ok(SampleOutput {
            sample_size: sample.len(),
            sample,
            array_length: array.len(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleOutput {
    pub shuffled: Vec<Value>,
    pub array_length: usize,
}

/// `random_shuffle`: Fisher-Yates permutation of the array.
pub struct RandomShuffleOp;

impl Operation for RandomShuffleOp {
    type Args = ArrayArgs;
    type Input = Vec<Value>;
    type Output = ShuffleOutput;

    fn name(&self) -> &'static str {
        "random_shuffle"
    }

    fn description(&self) -> &'static str {
        "Shuffle an array with Fisher-Yates"
    }

    fn validate(&self, args: ArrayArgs, limits: &DispatchConfig) -> DispatchResult<Vec<Value>> {
        checked_array(args.array, limits)
    }

    fn execute(&self, mut array: Vec<Value>) -> DispatchResult<ShuffleOutput> {
        SecureRandom::new().shuffle(&mut array)?;
        Ok(ShuffleOutput {
            array_length: array.len(),
            shuffled: array,
        })
    }
}

// ---------------------------------------------------------------------------
// random_uuid
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UuidOutput {
    pub uuid: String,
}

/// `random_uuid`: version-4 UUID.
pub struct RandomUuidOp;

impl Operation for RandomUuidOp {
    type Args = NoArgs;
    type Input = ();
    type Output = UuidOutput;

    fn name(&self) -> &'static str {
        "random_uuid"
    }

    fn description(&self) -> &'static str {
        "Generate a random version-4 UUID"
    }

    fn validate(&self, _args: NoArgs, _limits: &DispatchConfig) -> DispatchResult<()> {
        Ok(())
    }

    fn execute(&self, _input: ()) -> DispatchResult<UuidOutput> {
        Ok(UuidOutput {
            uuid: SecureRandom::new().uuid()?,
        })
    }
}
