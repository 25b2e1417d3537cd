pub mod vasicek_analytic;
