/// Fixed-size byte arrays as lowercase hex strings.
pub mod hex {
    use std::fmt;

    use serde::{
        de::{self, Deserializer, Visitor},
        ser::Serializer,
    };

    pub fn serialize<S, const N: usize>(value: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(value))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(HexVisitor::<N>)
    }

    struct HexVisitor<const N: usize>;

    impl<const N: usize> Visitor<'_> for HexVisitor<N> {
        type Value = [u8; N];

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a {N}-byte array encoded as hex string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.len() != N * 2 {
                return Err(E::custom(format!(
                    "value must be exactly {} characters long",
                    N * 2
                )));
            }

            let mut data = [0; N];
            hex::decode_to_slice(v, &mut data).map_err(E::custom)?;

            Ok(data)
        }
    }

    #[cfg(test)]
    mod tests {
        use serde::{Deserialize, Serialize};
        use serde_test::{Token, assert_de_tokens_error, assert_tokens};

        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Key {
            #[serde(with = "super")]
            key: [u8; 4],
        }

        fn tokens(value: &'static str) -> [Token; 4] {
            [
                Token::Struct {
                    name: "Key",
                    len: 1,
                },
                Token::Str("key"),
                Token::Str(value),
                Token::StructEnd,
            ]
        }

        #[test]
        fn valid() {
            assert_tokens(
                &Key {
                    key: [0xde, 0xad, 0xbe, 0xef],
                },
                &tokens("deadbeef"),
            );
        }

        #[test]
        fn wrong_length() {
            assert_de_tokens_error::<Key>(
                &tokens("dead"),
                "value must be exactly 8 characters long",
            );
            assert_de_tokens_error::<Key>(
                &tokens("deadbeef00"),
                "value must be exactly 8 characters long",
            );
        }

        #[test]
        fn not_hex() {
            assert_de_tokens_error::<Key>(
                &tokens("deadbeeg"),
                "Invalid character 'g' at position 7",
            );
        }
    }
}
