//! Prime table sizing shared by both hash engines.

use num_traits::PrimInt;

/// Returns the smallest prime `>= x`, or 3 for `x <= 2`.
///
/// Even inputs are bumped to the next odd number first; candidates are then tested by trial
/// division with odd divisors up to the square root.
pub fn next_prime<T: PrimInt>(x: T) -> T {
    let two = T::one() + T::one();
    let three = two + T::one();
    if x <= two {
        return three;
    }

    let mut candidate = if x % two == T::zero() { x + T::one() } else { x };
    while !is_odd_prime(candidate) {
        candidate = candidate + two;
    }
    candidate
}

fn is_odd_prime<T: PrimInt>(x: T) -> bool {
    let two = T::one() + T::one();
    let mut divisor = two + T::one();
    while let Some(square) = divisor.checked_mul(&divisor) {
        if square > x {
            break;
        }
        if x % divisor == T::zero() {
            return false;
        }
        divisor = divisor + two;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::next_prime;

    #[test]
    fn test_small_inputs() {
        assert_eq!(next_prime(0usize), 3);
        assert_eq!(next_prime(1usize), 3);
        assert_eq!(next_prime(2usize), 3);
        assert_eq!(next_prime(3usize), 3);
        assert_eq!(next_prime(4usize), 5);
        assert_eq!(next_prime(8usize), 11);
        assert_eq!(next_prime(9usize), 11);
        assert_eq!(next_prime(25usize), 29);
    }

    #[test]
    fn test_table_growth_sequence() {
        // Doubling from the default size of 19.
        assert_eq!(next_prime(38usize), 41);
        assert_eq!(next_prime(82usize), 83);
        assert_eq!(next_prime(166usize), 167);
        assert_eq!(next_prime(334usize), 337);
    }

    #[test]
    fn test_results_are_prime() {
        for x in 3u64..2_000 {
            let p = next_prime(x);
            assert!(p >= x);
            assert!((2..p).take_while(|d| d * d <= p).all(|d| p % d != 0), "{p}");
        }
    }
}
