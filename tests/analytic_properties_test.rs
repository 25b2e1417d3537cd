// tests/analytic_properties_test.rs
use proptest::prelude::*;
use vasicek_mc::analytics::vasicek_analytic::{
    b_function, try_zero_coupon_bond_price, zero_coupon_bond_price,
};
use vasicek_mc::models::vasicek::VasicekParams;
use vasicek_mc::{analytical_estimate, PricingMethod, VasicekError};

proptest! {
    #[test]
    fn price_decreases_in_initial_rate(
        kappa in 0.01f64..5.0,
        theta in -0.02f64..0.10,
        sigma in 0.0f64..0.05,
        r0 in -0.02f64..0.15,
        t in 0.1f64..30.0,
        dr in 1e-4f64..0.05,
    ) {
        let low = VasicekParams::new(kappa, theta, sigma, r0, t).unwrap();
        let high = low.with_r0(r0 + dr).unwrap();
        let p_low = zero_coupon_bond_price(&low);
        let p_high = zero_coupon_bond_price(&high);

        prop_assert!(p_low.is_finite() && p_low > 0.0);
        prop_assert!(p_high < p_low, "P({}) = {} >= P({}) = {}", r0 + dr, p_high, r0, p_low);
    }

    #[test]
    fn b_function_lies_between_zero_and_maturity(kappa in 0.001f64..10.0, t in 0.01f64..50.0) {
        let b = b_function(kappa, t).unwrap();
        prop_assert!(b > 0.0);
        prop_assert!(b <= t);
    }

    #[test]
    fn checked_and_params_forms_agree(
        kappa in 0.05f64..3.0,
        theta in 0.0f64..0.08,
        sigma in 0.0f64..0.03,
        r0 in 0.0f64..0.10,
        t in 0.25f64..10.0,
    ) {
        let params = VasicekParams::new(kappa, theta, sigma, r0, t).unwrap();
        let checked = try_zero_coupon_bond_price(kappa, theta, sigma, r0, t).unwrap();
        prop_assert_eq!(checked, zero_coupon_bond_price(&params));
    }
}

#[test]
fn test_short_maturity_prices_at_par() {
    let params = VasicekParams::new(0.5, 0.03, 0.01, 0.02, 1e-8).unwrap();
    assert!((zero_coupon_bond_price(&params) - 1.0).abs() < 1e-9);
}

#[test]
fn test_zero_mean_reversion_is_a_domain_error() {
    assert!(matches!(
        try_zero_coupon_bond_price(0.0, 0.03, 0.01, 0.02, 5.0),
        Err(VasicekError::DomainError { .. })
    ));
}

#[test]
fn test_analytical_estimate_shape() {
    let params = VasicekParams::new(0.5, 0.03, 0.01, 0.02, 5.0).unwrap();
    let estimate = analytical_estimate(&params);
    assert_eq!(estimate.method, PricingMethod::Analytical);
    assert_eq!(estimate.standard_error, 0.0);
    assert_eq!(estimate.effective_simulation_count, 0);
    assert!((estimate.price - 0.877_062_187_7).abs() < 1e-9);
}
