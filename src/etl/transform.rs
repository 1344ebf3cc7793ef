//! Record transformers and their composition
//!
//! The cleaning step is a chain of small transformers over [`RawRecord`]s
//! (rename columns, encode the price area) ending in a cast to typed rows.
//! [`Transformer::then`] builds such chains; [`Transformer::transform_many`]
//! runs one over a whole extraction and names the failing record.
//!
//! [`RawRecord`]: crate::extract::RawRecord

use eyre::{Result, WrapErr};

/// One step between extraction and loading
///
/// # Example
/// ```
/// use energy_feature_pipeline::etl::Transformer;
/// use energy_feature_pipeline::extract::{DatetimeFormat, RawRecord};
/// use energy_feature_pipeline::transform::{AreaEncoder, ColumnRenamer, FeatureCaster};
///
/// let cleaning = ColumnRenamer::energy_consumption()
///     .then(AreaEncoder::danish_price_areas())
///     .then(FeatureCaster::new(DatetimeFormat::file_default()));
///
/// let row = cleaning
///     .transform(RawRecord::from_iter([
///         ("HourUTC", "2023-06-01 21:00"),
///         ("PriceArea", "DK1"),
///         ("ConsumerType_DE35", "111"),
///         ("TotalCon", "4523.5"),
///     ]))
///     .unwrap();
/// assert_eq!(row.area, 1);
/// ```
pub trait Transformer: Send + Sync {
    type Input: Send;
    type Output: Send;

    /// # Errors
    /// Returns an error if the record cannot be converted (unknown category, bad cast)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Transform every record, failing on the first bad one.
    ///
    /// The error names the 1-based position of the failing record.
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs
            .into_iter()
            .enumerate()
            .map(|(idx, input)| {
                self.transform(input)
                    .wrap_err_with(|| format!("Failed to clean record {}", idx + 1))
            })
            .collect()
    }

    /// Feed the output of this transformer into `next`
    fn then<N>(self, next: N) -> Chain<Self, N>
    where
        Self: Sized,
        N: Transformer<Input = Self::Output>,
    {
        Chain { first: self, next }
    }
}

/// Two transformers applied one after the other, see [`Transformer::then`]
pub struct Chain<A, B> {
    first: A,
    next: B,
}

impl<A, B> Transformer for Chain<A, B>
where
    A: Transformer,
    B: Transformer<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        self.next.transform(self.first.transform(input)?)
    }
}

/// Passes records through unchanged
pub struct IdentityTransformer<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for IdentityTransformer<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> IdentityTransformer<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Send + Sync> Transformer for IdentityTransformer<T> {
    type Input = T;
    type Output = T;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NonNegative;

    impl Transformer for NonNegative {
        type Input = i32;
        type Output = u32;

        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            u32::try_from(input).map_err(|_| eyre::eyre!("negative value {}", input))
        }
    }

    struct Hours;

    impl Transformer for Hours {
        type Input = u32;
        type Output = String;

        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            Ok(format!("{:02}:00", input))
        }
    }

    #[test]
    fn test_identity_transformer() {
        let transformer = IdentityTransformer::<i32>::new();
        let output = transformer.transform_many(vec![1, 2, 3]).unwrap();
        assert_eq!(output, [1, 2, 3]);
    }

    #[test]
    fn test_transform_many_names_failing_record() {
        let err = NonNegative.transform_many(vec![1, -2, 3]).unwrap_err();
        assert_eq!(err.to_string(), "Failed to clean record 2");
        assert!(format!("{:#}", err).contains("negative value -2"));
    }

    #[test]
    fn test_chain_applies_in_order() {
        let chain = NonNegative.then(Hours);
        assert_eq!(chain.transform_many(vec![0, 7]).unwrap(), ["00:00", "07:00"]);
        assert!(chain.transform(-1).is_err());
    }
}
