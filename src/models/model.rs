// src/models/model.rs
/// One-factor diffusion `dX_t = a(X_t, t) dt + b(X_t, t) dW_t`
pub trait SDEModel {
    fn drift(&self, x: f64, t: f64) -> f64;
    fn diffusion(&self, x: f64, t: f64) -> f64;
    fn step_with_dw(&self, x_current: &mut f64, t_current: f64, dt: f64, dw: f64);
}
