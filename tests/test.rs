use approx::assert_relative_eq;
use hyperscientific::Magnitude;
use num_traits::{ConstOne, ConstZero, ToPrimitive};

#[test]
fn test_norm() {
    assert_eq!(
        Magnitude::from_components(1, 2, 10.0),
        Magnitude::from_components(1, 1, 10_000_000_000.0)
    );
    assert_eq!(Magnitude::from_components(1, 1, 2.0), Magnitude::from(100.0));
    assert_eq!(Magnitude::from(1e20).into_components(), (1, 1, 20.0));
    assert_eq!(Magnitude::from_components(-3, 0, 4.0), Magnitude::from(-4.0));
    assert!(Magnitude::from_components(1, 4, f64::NAN).is_nan());
}

#[test]
fn test_ops() {
    const TEN_E_TWENTY: Magnitude = Magnitude::from_components_unchecked(1, 1, 20.0);
    const TEN_E_NINETEEN: Magnitude = Magnitude::from_components_unchecked(1, 1, 19.0);

    assert_eq!(TEN_E_TWENTY + TEN_E_TWENTY, Magnitude::from_components(1, 1, 20.30102999566398));
    assert!(Magnitude::from_components(1, 1, 9e15) > TEN_E_TWENTY);

    let small_l = Magnitude::from(2.0);
    let small_r = Magnitude::from(3.1);
    let big = Magnitude::from_components(1, 4, 1e10);

    assert_eq!(small_l + small_r, 5.1);
    assert_eq!(small_l - small_r, 2.0 - 3.1);
    assert_eq!(big + small_r, big);
    assert_eq!(small_l * small_r, 6.2);
    assert_eq!(-small_l * small_r, -6.2);
    assert_eq!(big * small_r, big);
    assert_eq!(big - big, 0.0);

    assert!((big + Magnitude::NAN).is_nan());
    assert_eq!(Magnitude::INFINITY + Magnitude::INFINITY, Magnitude::INFINITY);
    assert!((Magnitude::INFINITY + Magnitude::NEG_INFINITY).is_nan());
    assert!((Magnitude::INFINITY - Magnitude::INFINITY).is_nan());
    assert_eq!(Magnitude::ZERO - 1.0, -1.0);
    assert_eq!(-Magnitude::ONE - 1.0, -2.0);
    assert_eq!(Magnitude::ONE - -1.0, 2.0);
    assert_eq!(Magnitude::INFINITY * Magnitude::NEG_INFINITY, Magnitude::NEG_INFINITY);
    assert!((Magnitude::ZERO * Magnitude::INFINITY).is_nan());

    assert_eq!(TEN_E_TWENTY * TEN_E_TWENTY, Magnitude::from_components(1, 1, 40.0));
    assert_eq!(TEN_E_TWENTY - TEN_E_TWENTY, 0.0);
    assert_eq!(TEN_E_TWENTY - TEN_E_NINETEEN, Magnitude::from_components(1, 1, 19.954242509439325));
    assert_eq!(TEN_E_TWENTY / TEN_E_NINETEEN, 10.0);
    assert_eq!(small_l / 0.0, Magnitude::INFINITY);
    assert_eq!(Magnitude::INFINITY / 17.0, Magnitude::INFINITY);
    assert!((Magnitude::NAN / 1.0).is_nan());

    assert_eq!(Magnitude::from(5) % 3.0, 2.0);
    assert_eq!(Magnitude::from(-5) % 3.0, -2.0);
    assert!((Magnitude::NAN % 1.0).is_nan());
    assert_eq!(TEN_E_NINETEEN % TEN_E_TWENTY, TEN_E_NINETEEN);

    assert_eq!(Magnitude::ZERO.pow(Magnitude::ZERO), Magnitude::ONE);
    assert_relative_eq!(small_l.pow(small_r).to_f64(), 8.574187700290345, max_relative = 1e-15);
    assert_eq!(big.pow(Magnitude::ZERO), 1.0);
    assert_eq!(Magnitude::TEN.pow(TEN_E_TWENTY), Magnitude::from_components(1, 2, 20.0));
    assert!(Magnitude::from(-8).pow(Magnitude::from(0.5)).is_nan());

    assert_eq!(Magnitude::TEN.log10(), 1.0);
    assert_eq!(TEN_E_TWENTY.log10(), 20.0);
    assert_eq!(Magnitude::ZERO.log10(), Magnitude::NEG_INFINITY);
    assert!(Magnitude::from(-1).log10().is_nan());
    assert_relative_eq!(Magnitude::from(8).log(Magnitude::TWO).to_f64(), 3.0, max_relative = 1e-15);
    assert_relative_eq!(Magnitude::E.ln().to_f64(), 1.0, max_relative = 1e-15);
    assert_eq!(Magnitude::from(20).pow10(), TEN_E_TWENTY);
}

#[test]
fn test_cmp() {
    const BIG: Magnitude = Magnitude::from_components_unchecked(1, 3, 1e10);
    const BIGGER: Magnitude = Magnitude::from_components_unchecked(1, 3, 1.2e10);
    const BIGGERER: Magnitude = Magnitude::from_components_unchecked(1, 4, 1e10);
    const TINY: Magnitude = Magnitude::from_components_unchecked(1, 1, -400.0);

    assert!(Magnitude::NAN != Magnitude::NAN);
    assert!(!(Magnitude::NAN < Magnitude::NAN));
    assert!(!(Magnitude::NAN > Magnitude::NAN));
    assert!(Magnitude::INFINITY == Magnitude::INFINITY);
    assert!(Magnitude::ONE > Magnitude::ZERO);
    assert!(Magnitude::ONE > -Magnitude::ONE);

    assert!(BIG > 1.0);
    assert!(BIG > -1.0);
    assert!(Magnitude::INFINITY > BIG);
    assert!(Magnitude::NEG_INFINITY < BIG);
    assert!(BIGGER > BIG);
    assert!(-BIGGER < -BIG);
    assert!(BIGGERER > BIGGER);
    assert!(BIGGERER >= BIGGERER);

    assert!(TINY > Magnitude::ZERO);
    assert!(TINY < Magnitude::from(1e-300));
    assert!(-TINY > -Magnitude::from(1e-300));
}

#[test]
fn test_ident() {
    let big = Magnitude::from_components(1, 3, 1e10);

    assert!(Magnitude::ONE.is_finite());
    assert!(!Magnitude::NAN.is_finite());
    assert!(!Magnitude::INFINITY.is_finite());
    assert!(Magnitude::INFINITY.is_infinite());
    assert!(!Magnitude::NAN.is_infinite());
    assert!(!Magnitude::INFINITY.is_integer());
    assert!(!Magnitude::NAN.is_integer());
    assert!(Magnitude::ONE.is_integer());
    assert!(!Magnitude::from(1.5).is_integer());
    assert!(big.is_integer());

    assert!(!Magnitude::ZERO.is_positive());
    assert!(!Magnitude::ZERO.is_negative());
    assert!(!Magnitude::NAN.is_positive());
    assert_eq!(Magnitude::from(-7.5).signum(), -1.0);

    assert_eq!(Magnitude::from(2.5).round(), 3.0);
    assert_eq!(Magnitude::from(-2.5).round(), -3.0);
    assert_eq!(Magnitude::from(-2.5).floor(), -3.0);
    assert_eq!(Magnitude::from(-2.5).trunc(), -2.0);
    assert_eq!(big.floor(), big);
    assert_eq!(Magnitude::from_components(1, 1, -40.0).ceil(), 1.0);
}

#[test]
fn test_conv() {
    assert_eq!(ToPrimitive::to_f64(&Magnitude::ONE), Some(1.0_f64));
    assert_eq!(ToPrimitive::to_i64(&Magnitude::ONE), Some(1));
    assert_eq!(ToPrimitive::to_u64(&Magnitude::NEG_ONE), None);
    assert_eq!(Magnitude::from(7u8), 7.0);

    assert_eq!(Magnitude::from_components(1, 3, 1e10).to_f64(), f64::INFINITY);
    assert_eq!(Magnitude::from_components(-1, 2, -20.0).to_f64(), 0.0);
    assert_relative_eq!(Magnitude::from(1e300).to_f64(), 1e300, max_relative = 1e-12);
}

#[test]
fn test_display() {
    assert_eq!(Magnitude::from(1.5).to_string(), "1.5");
    assert_eq!(Magnitude::from(-1e20).to_string(), "-1e20");
    assert_eq!(Magnitude::from_components(1, 2, 20.0).to_string(), "ee20");
    assert_eq!(Magnitude::from_components(1, 7, 20.0).to_string(), "(e^7)20");
    assert_eq!(Magnitude::NEG_INFINITY.to_string(), "-Infinity");
    assert_eq!(Magnitude::NAN.to_string(), "NaN");
}

#[test]
fn test_parse() {
    assert_eq!("0".parse::<Magnitude>().unwrap(), 0.0);
    assert_eq!("17".parse::<Magnitude>().unwrap(), 17.0);
    assert_eq!("-13.73".parse::<Magnitude>().unwrap(), -13.73);
    assert_eq!("0.05".parse::<Magnitude>().unwrap(), 0.05);
    assert_eq!("1e500".parse::<Magnitude>().unwrap(), Magnitude::from_components(1, 1, 500.0));
    assert_eq!("ee10".parse::<Magnitude>().unwrap(), Magnitude::from_components(1, 1, 1e10));
    assert_eq!("10^^3".parse::<Magnitude>().unwrap(), "ee10".parse::<Magnitude>().unwrap());
    assert_eq!("10^20".parse::<Magnitude>().unwrap(), Magnitude::from_components(1, 1, 20.0));
    assert_eq!("Infinity".parse::<Magnitude>().unwrap(), Magnitude::INFINITY);
    assert_eq!("-Infinity".parse::<Magnitude>().unwrap(), Magnitude::NEG_INFINITY);
    assert!("NaN".parse::<Magnitude>().unwrap().is_nan());
    assert!("".parse::<Magnitude>().is_err());
    assert!("Na".parse::<Magnitude>().is_err());
    assert!("-".parse::<Magnitude>().is_err());
    assert!("+".parse::<Magnitude>().is_err());
    assert!("01".parse::<Magnitude>().is_err());
    assert!("10{4".parse::<Magnitude>().is_err());
    assert!("10{}4".parse::<Magnitude>().is_err());
    assert!("10{4}3".parse::<Magnitude>().is_err());
    assert!("10^^".parse::<Magnitude>().is_err());
    assert!("1e".parse::<Magnitude>().is_err());
    assert!("1e05".parse::<Magnitude>().is_err());
}
