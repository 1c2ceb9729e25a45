//! Ephemeral Diffie-Hellman key agreement over a fixed safe-prime group.
//!
//! The heavy lifting (modular exponentiation) comes from `num-bigint`; this
//! module only frames parameters, validates peer values and produces the
//! pre-master secret.

use num_bigint::{BigUint, RandBigInt};
use rand;

use error::Error;
use wire::handshake::{ClientKeyExchange, ServerDhParams};

// The 2048-bit MODP group. A safe prime, generator 2.
const MODP_2048_PRIME: &'static [u8] = &hex!("ffffffffffffffffc90fdaa22168c234c4c6628b80dc1cd129024e088a67cc74020bbea63b139b22514a08798e3404ddef9519b3cd3a431b302b0a6df25f14374fe1356d6d51c245e485b576625e7ec6f44c42e9a637ed6b0bff5cb6f406b7edee386bfb5a899fa5ae9f24117c4b1fe649286651ece45b3dc2007cb8a163bf0598da48361c55d39a69163fa8fd24cf5f83655d23dca3ad961c62f356208552bb9ed529077096966d670c354e4abc9804f1746c08ca18217c32905e462e36ce3be39e772c180e86039b2783a2ec07a28fb5c55df06f4c52c9de2bcbf6955817183995497cea956ae515d2261898fa051015728e5a8aacaa68ffffffffffffffff");

const MODP_2048_GENERATOR: u32 = 2;

/// The key agreement negotiated for a connection. A single variant today;
/// the enum is the seam where an ECDHE agreement would slot in.
pub enum KeyAgreement {
    Dhe(DheKeyAgreement),
}

impl KeyAgreement {
    pub fn dhe() -> Self {
        KeyAgreement::Dhe(DheKeyAgreement::new())
    }

    pub fn generate_server_key_exchange(&mut self) -> Result<ServerDhParams, Error> {
        match self {
            &mut KeyAgreement::Dhe(ref mut dhe) => dhe.generate_server_key_exchange(),
        }
    }

    pub fn process_client_key_exchange(
        &mut self,
        client_key_exchange: &ClientKeyExchange,
    ) -> Result<Vec<u8>, Error> {
        match self {
            &mut KeyAgreement::Dhe(ref mut dhe) => {
                dhe.process_client_key_exchange(client_key_exchange)
            }
        }
    }

    pub fn process_server_key_exchange(&mut self, params: &ServerDhParams) -> Result<(), Error> {
        match self {
            &mut KeyAgreement::Dhe(ref mut dhe) => dhe.process_server_key_exchange(params),
        }
    }

    pub fn generate_client_key_exchange(
        &mut self,
    ) -> Result<(Vec<u8>, ClientKeyExchange), Error> {
        match self {
            &mut KeyAgreement::Dhe(ref mut dhe) => dhe.generate_client_key_exchange(),
        }
    }
}

pub struct DheKeyAgreement {
    p: BigUint,
    g: BigUint,
    private: Option<BigUint>,
    peer_public: Option<BigUint>,
}

impl DheKeyAgreement {
    fn new() -> Self {
        DheKeyAgreement {
            p: BigUint::from_bytes_be(MODP_2048_PRIME),
            g: BigUint::from(MODP_2048_GENERATOR),
            private: None,
            peer_public: None,
        }
    }

    // A public value must be a group element that generates more than the
    // trivial subgroups: reject 0, 1 and p-1, and anything >= p.
    fn check_public(&self, public: &BigUint) -> Result<(), Error> {
        let one = BigUint::from(1u32);
        if *public <= one || *public >= &self.p - one {
            return Err(Error::KeyAgreementFailure("degenerate peer public value"));
        }
        Ok(())
    }

    fn generate_private(&mut self) -> BigUint {
        let private = rand::thread_rng().gen_biguint_below(&self.p);
        self.private = Some(private.clone());
        private
    }

    /// Server side: pick a private exponent and publish the group and our
    /// public value.
    pub fn generate_server_key_exchange(&mut self) -> Result<ServerDhParams, Error> {
        let private = self.generate_private();
        let public = self.g.modpow(&private, &self.p);
        Ok(ServerDhParams {
            p: self.p.to_bytes_be(),
            g: self.g.to_bytes_be(),
            public_key: public.to_bytes_be(),
        })
    }

    /// Server side: combine the client's public value with our private
    /// exponent into the pre-master secret.
    pub fn process_client_key_exchange(
        &mut self,
        client_key_exchange: &ClientKeyExchange,
    ) -> Result<Vec<u8>, Error> {
        let private = match self.private {
            Some(ref private) => private,
            None => return Err(Error::KeyAgreementFailure("no server parameters generated")),
        };
        let peer = BigUint::from_bytes_be(&client_key_exchange.public_key);
        self.check_public(&peer)?;
        Ok(peer.modpow(private, &self.p).to_bytes_be())
    }

    /// Client side: adopt the server's group, validate its public value and
    /// pick our own private exponent.
    pub fn process_server_key_exchange(&mut self, params: &ServerDhParams) -> Result<(), Error> {
        let p = BigUint::from_bytes_be(&params.p);
        let g = BigUint::from_bytes_be(&params.g);
        // An implausibly small prime cannot yield a useful shared secret.
        if p.bits() < 512 {
            return Err(Error::KeyAgreementFailure("prime is too small"));
        }
        self.p = p;
        self.g = g;
        let peer = BigUint::from_bytes_be(&params.public_key);
        self.check_public(&peer)?;
        self.peer_public = Some(peer);
        self.generate_private();
        Ok(())
    }

    /// Client side: publish our public value and derive the pre-master
    /// secret from the server's.
    pub fn generate_client_key_exchange(
        &mut self,
    ) -> Result<(Vec<u8>, ClientKeyExchange), Error> {
        let private = match self.private {
            Some(ref private) => private,
            None => {
                return Err(Error::KeyAgreementFailure("no server parameters processed"));
            }
        };
        let peer = match self.peer_public {
            Some(ref peer) => peer,
            None => {
                return Err(Error::KeyAgreementFailure("no server parameters processed"));
            }
        };
        let public = self.g.modpow(private, &self.p);
        let pre_master_secret = peer.modpow(private, &self.p).to_bytes_be();
        Ok((
            pre_master_secret,
            ClientKeyExchange {
                public_key: public.to_bytes_be(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire::handshake::ClientKeyExchange;

    #[test]
    fn both_sides_agree() {
        let mut server = KeyAgreement::dhe();
        let mut client = KeyAgreement::dhe();

        let params = server.generate_server_key_exchange().unwrap();
        client.process_server_key_exchange(&params).unwrap();
        let (client_secret, client_key_exchange) =
            client.generate_client_key_exchange().unwrap();
        let server_secret = server
            .process_client_key_exchange(&client_key_exchange)
            .unwrap();

        assert_eq!(client_secret, server_secret);
        assert!(!client_secret.is_empty());
    }

    #[test]
    fn degenerate_publics_are_rejected() {
        let mut server = KeyAgreement::dhe();
        server.generate_server_key_exchange().unwrap();

        for bad in &[vec![0], vec![1]] {
            let result = server.process_client_key_exchange(&ClientKeyExchange {
                public_key: bad.clone(),
            });
            assert!(result.is_err());
        }

        // p itself is out of range too.
        let result = server.process_client_key_exchange(&ClientKeyExchange {
            public_key: MODP_2048_PRIME.to_vec(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn small_primes_are_rejected() {
        let mut client = KeyAgreement::dhe();
        let params = ServerDhParams {
            p: vec![0xfb],
            g: vec![2],
            public_key: vec![4],
        };
        assert!(client.process_server_key_exchange(&params).is_err());
    }

    #[test]
    fn client_needs_server_parameters_first() {
        let mut client = KeyAgreement::dhe();
        assert!(client.generate_client_key_exchange().is_err());
    }
}
