pub mod securepay;
