use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};

use crate::error::Result;
use crate::map::AnchorMap;
use crate::params::AnchorParams;

impl AnchorMap<f32> {
    /// Moves the anchors onto `device` as a `[channels, height, width]` tensor.
    pub fn into_tensor<B: Backend>(self, device: &B::Device) -> Tensor<B, 3> {
        let shape = self.shape();
        Tensor::<B, 3>::from_data(TensorData::new(self.into_vec(), shape), device)
    }
}

/// Generates the anchors described by `params` directly as a tensor on `device`.
pub fn anchor_tensor<B: Backend>(params: &AnchorParams, device: &B::Device) -> Result<Tensor<B, 3>> {
    Ok(params.generate::<f32>()?.into_tensor(device))
}
