//! End-to-end tests of the card session client against the emulated card.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tapcard::emulator::CardEmulator;
use tapcard::types::{
    AttestationStatus, CardSettings, FileSettings, FileSettingsChange, FileToWrite,
    FileVisibility, SigningMethod, UserCode, UserCodeType,
};
use tapcard::{
    CardClient, CardId, DerivationPath, EllipticCurve, Error, ErrorKind, NfcStatus, WalletConfig,
};

fn client_with_card(emulator: CardEmulator) -> (CardClient<Arc<CardEmulator>>, Arc<CardEmulator>) {
    let card = Arc::new(emulator);
    let client = CardClient::new(Arc::clone(&card));
    (client, card)
}

#[tokio::test]
async fn scan_returns_full_snapshot() {
    let (client, card) = client_with_card(
        CardEmulator::builder()
            .card_id("CB42000000001234")
            .batch_id("0042")
            .build(),
    );

    let scanned = client.scan_card(None, None).await.unwrap();
    assert_eq!(scanned.card_id, card.card_id());
    assert_eq!(scanned.batch_id, "0042");
    assert_eq!(scanned.firmware_version.to_string(), "4.52r");
    assert!(!scanned.supported_curves.is_empty());
    assert!(scanned.wallets.is_empty());
    assert_eq!(
        scanned.attestation.card_key_attestation,
        AttestationStatus::Skipped
    );
}

#[tokio::test]
async fn wallet_curves_stay_within_supported_set() {
    let (client, _card) = client_with_card(
        CardEmulator::builder()
            .supported_curves(vec![EllipticCurve::Secp256k1, EllipticCurve::Ed25519])
            .build(),
    );

    for curve in [EllipticCurve::Secp256k1, EllipticCurve::Ed25519] {
        client
            .create_wallet(WalletConfig::new(curve), None, None)
            .await
            .unwrap();
    }

    let card = client.scan_card(None, None).await.unwrap();
    assert_eq!(card.wallets.len(), 2);
    for wallet in &card.wallets {
        assert!(card.supported_curves.contains(&wallet.curve));
    }
}

#[tokio::test]
async fn wallet_lifecycle_scenario() {
    // Card with supportedCurves = [Secp256k1], zero wallets.
    let (client, _card) = client_with_card(
        CardEmulator::builder()
            .supported_curves(vec![EllipticCurve::Secp256k1])
            .build(),
    );

    // Unsupported curve is rejected.
    let err = client
        .create_wallet(WalletConfig::new(EllipticCurve::Ed25519), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedCurve(EllipticCurve::Ed25519)));

    // Supported curve lands in slot 0.
    let created = client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap();
    assert_eq!(created.wallet.index, 0);
    assert_eq!(created.wallet.curve, EllipticCurve::Secp256k1);
    assert!(created.wallet.chain_code.is_some());

    // The subsequent scan shows exactly that wallet.
    let card = client.scan_card(None, None).await.unwrap();
    assert_eq!(card.wallets, vec![created.wallet.clone()]);

    // Purge succeeds and the next scan is empty.
    client
        .purge_wallet(created.wallet.public_key, None, None)
        .await
        .unwrap();
    let card = client.scan_card(None, None).await.unwrap();
    assert!(card.wallets.is_empty());
}

#[tokio::test]
async fn purged_wallet_indices_are_not_reused() {
    let (client, _card) = client_with_card(CardEmulator::new());

    let first = client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap();
    assert_eq!(first.wallet.index, 0);

    client
        .purge_wallet(first.wallet.public_key, None, None)
        .await
        .unwrap();

    let second = client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap();
    assert_eq!(second.wallet.index, 1);
}

#[tokio::test]
async fn wallet_indices_are_finite() {
    let (client, _card) = client_with_card(CardEmulator::new());

    // Burn through every lifetime slot index; purging keeps the live count
    // at zero, so only the index supply can run out.
    for expected in 0..=u8::MAX {
        let created = client
            .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
            .await
            .unwrap();
        assert_eq!(created.wallet.index, expected);
        client
            .purge_wallet(created.wallet.public_key, None, None)
            .await
            .unwrap();
    }

    let err = client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::WalletIndicesExhausted));
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
}

#[tokio::test]
async fn permanent_wallet_cannot_be_purged() {
    let (client, _card) = client_with_card(
        CardEmulator::builder()
            .with_permanent_wallet(EllipticCurve::Secp256k1)
            .build(),
    );

    let card = client.scan_card(None, None).await.unwrap();
    let wallet = &card.wallets[0];
    assert!(wallet.settings.is_permanent);

    let err = client
        .purge_wallet(wallet.public_key.clone(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PurgeForbidden));
    assert_eq!(err.kind(), ErrorKind::PolicyViolation);

    // Still present afterwards.
    let card = client.scan_card(None, None).await.unwrap();
    assert_eq!(card.wallets.len(), 1);
}

#[tokio::test]
async fn wallet_slots_exhaust() {
    let (client, _card) = client_with_card(CardEmulator::builder().max_wallets(1).build());

    client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap();
    let err = client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::WalletSlotsExhausted { max: 1 }));
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
}

#[tokio::test]
async fn sign_preserves_length_and_order() {
    let (client, card) = client_with_card(CardEmulator::new());
    let card_id = card.card_id();

    let wallet = client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap()
        .wallet;

    let first = Bytes::from_static(&[0xAA; 32]);
    let second = Bytes::from_static(&[0xBB; 32]);

    let forward = client
        .sign(
            vec![first.clone(), second.clone()],
            wallet.public_key.clone(),
            card_id.clone(),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(forward.signatures.len(), 2);
    assert_eq!(forward.card_id, card_id);

    let reversed = client
        .sign(
            vec![second, first],
            wallet.public_key.clone(),
            card_id,
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(forward.signatures[0], reversed.signatures[1]);
    assert_eq!(forward.signatures[1], reversed.signatures[0]);
}

#[tokio::test]
async fn sign_with_derivation_path_differs_from_master() {
    let (client, card) = client_with_card(CardEmulator::new());
    let card_id = card.card_id();

    let wallet = client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap()
        .wallet;
    let hash = Bytes::from_static(&[0x11; 32]);
    let path: DerivationPath = "m/44'/0'/0'/0/0".parse().unwrap();

    let master = client
        .sign(
            vec![hash.clone()],
            wallet.public_key.clone(),
            card_id.clone(),
            None,
            None,
        )
        .await
        .unwrap();
    let derived = client
        .sign(vec![hash], wallet.public_key, card_id, Some(path), None)
        .await
        .unwrap();
    assert_ne!(master.signatures[0], derived.signatures[0]);
}

#[tokio::test]
async fn signature_budget_exhausts() {
    let (client, card) = client_with_card(CardEmulator::builder().signature_budget(1).build());
    let card_id = card.card_id();

    let wallet = client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap()
        .wallet;
    assert_eq!(wallet.remaining_signatures, Some(1));

    let err = client
        .sign(
            vec![Bytes::from_static(&[1; 32]), Bytes::from_static(&[2; 32])],
            wallet.public_key.clone(),
            card_id.clone(),
            None,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoRemainingSignatures));

    // A single hash still fits the budget, after which it is spent.
    client
        .sign(
            vec![Bytes::from_static(&[1; 32])],
            wallet.public_key.clone(),
            card_id.clone(),
            None,
            None,
        )
        .await
        .unwrap();
    let err = client
        .sign(
            vec![Bytes::from_static(&[3; 32])],
            wallet.public_key,
            card_id,
            None,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoRemainingSignatures));
}

#[tokio::test]
async fn hash_signing_requires_the_sign_hash_method() {
    let (client, card) = client_with_card(CardEmulator::new());
    let card_id = card.card_id();

    let mut config = WalletConfig::new(EllipticCurve::Secp256k1);
    config.signing_methods = vec![SigningMethod::SignRaw];
    let wallet = client.create_wallet(config, None, None).await.unwrap().wallet;

    let err = client
        .sign(
            vec![Bytes::from_static(&[0x44; 32])],
            wallet.public_key,
            card_id,
            None,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SigningMethodNotAllowed));
    assert_eq!(err.kind(), ErrorKind::PolicyViolation);

    let mut config = WalletConfig::new(EllipticCurve::Secp256k1);
    config.signing_methods = Vec::new();
    let err = client.create_wallet(config, None, None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[tokio::test]
async fn derivation_rejected_when_hd_signing_disabled() {
    let settings = CardSettings {
        is_hd_wallet_allowed: false,
        ..CardSettings::default()
    };
    let (client, card) = client_with_card(CardEmulator::builder().settings(settings).build());
    let card_id = card.card_id();

    let wallet = client
        .create_wallet(WalletConfig::new(EllipticCurve::Secp256k1), None, None)
        .await
        .unwrap()
        .wallet;

    let path: DerivationPath = "m/0".parse().unwrap();
    let err = client
        .sign(
            vec![Bytes::from_static(&[0x33; 32])],
            wallet.public_key.clone(),
            card_id.clone(),
            Some(path),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HdWalletDisabled));
    assert_eq!(err.kind(), ErrorKind::PolicyViolation);

    // Master-key signing stays available.
    client
        .sign(
            vec![Bytes::from_static(&[0x33; 32])],
            wallet.public_key,
            card_id,
            None,
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn issuer_data_counter_rejects_replay() {
    let (client, _card) = client_with_card(
        CardEmulator::builder()
            .issuer_data(Bytes::from_static(b"seed"), Bytes::from_static(b"sig"), Some(5))
            .build(),
    );

    let read = client.read_issuer_data(None, None).await.unwrap();
    assert_eq!(read.data, Bytes::from_static(b"seed"));
    assert_eq!(read.counter, Some(5));

    // Counter must strictly increase.
    let err = client
        .write_issuer_data(
            Bytes::from_static(b"new"),
            Bytes::from_static(b"sig2"),
            Some(5),
            None,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::NonIncreasingCounter {
            stored: 5,
            provided: 5,
        }
    ));
    assert_eq!(err.kind(), ErrorKind::ReplayViolation);

    client
        .write_issuer_data(
            Bytes::from_static(b"new"),
            Bytes::from_static(b"sig2"),
            Some(6),
            None,
            None,
        )
        .await
        .unwrap();
    let read = client.read_issuer_data(None, None).await.unwrap();
    assert_eq!(read.data, Bytes::from_static(b"new"));
    assert_eq!(read.counter, Some(6));
}

#[tokio::test]
async fn issuer_extra_data_round_trip() {
    let (client, _card) = client_with_card(CardEmulator::new());

    let payload = Bytes::from(vec![0x5A; 2048]);
    client
        .write_issuer_extra_data(
            payload.clone(),
            Bytes::from_static(b"start"),
            Bytes::from_static(b"final"),
            Some(1),
            None,
            None,
        )
        .await
        .unwrap();

    let read = client.read_issuer_extra_data(None, None).await.unwrap();
    assert_eq!(read.data, payload);
    assert_eq!(read.starting_signature, Some(Bytes::from_static(b"start")));
    assert_eq!(read.finalizing_signature, Some(Bytes::from_static(b"final")));
    assert_eq!(read.counter, Some(1));
}

#[tokio::test]
async fn protected_user_data_requires_passcode() {
    let (client, _card) = client_with_card(CardEmulator::new());

    let err = client
        .write_user_protected_data(Bytes::from_static(b"secret"), None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PasscodeRequired));

    client
        .set_passcode(UserCode::new("123456"), None, None)
        .await
        .unwrap();
    client
        .write_user_protected_data(Bytes::from_static(b"secret"), None, None, None)
        .await
        .unwrap();

    let read = client.read_user_data(None, None).await.unwrap();
    assert_eq!(read.protected_data, Some(Bytes::from_static(b"secret")));
}

#[tokio::test]
async fn wrong_passcode_entry_is_rejected() {
    let (client, card) = client_with_card(CardEmulator::builder().passcode("123456").build());

    card.enter_user_code(UserCodeType::Passcode, "999999");
    let err = client
        .write_user_protected_data(Bytes::from_static(b"secret"), None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::WrongUserCode(UserCodeType::Passcode)));
    assert_eq!(err.kind(), ErrorKind::PolicyViolation);

    // The next prompt is answered correctly and the write goes through.
    client
        .write_user_protected_data(Bytes::from_static(b"secret"), None, None, None)
        .await
        .unwrap();
    let read = client.read_user_data(None, None).await.unwrap();
    assert_eq!(read.protected_data, Some(Bytes::from_static(b"secret")));
}

#[tokio::test]
async fn wrong_access_code_entry_is_rejected() {
    let (client, card) = client_with_card(CardEmulator::new());

    client
        .set_access_code(UserCode::new("111111"), None, None)
        .await
        .unwrap();
    card.enter_user_code(UserCodeType::AccessCode, "222222");
    let err = client
        .write_user_data(Bytes::from_static(b"note"), None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::WrongUserCode(UserCodeType::AccessCode)));

    client
        .write_user_data(Bytes::from_static(b"note"), None, None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn user_data_write_and_read_back() {
    let (client, _card) = client_with_card(CardEmulator::builder().user_counter(3).build());

    let err = client
        .write_user_data(Bytes::from_static(b"note"), Some(2), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReplayViolation);

    client
        .write_user_data(Bytes::from_static(b"note"), Some(4), None, None)
        .await
        .unwrap();
    let read = client.read_user_data(None, None).await.unwrap();
    assert_eq!(read.data, Bytes::from_static(b"note"));
    assert_eq!(read.counter, Some(4));
}

#[tokio::test]
async fn setting_user_codes_respects_card_settings() {
    let settings = CardSettings {
        is_setting_access_code_allowed: false,
        ..CardSettings::default()
    };
    let (client, card) = client_with_card(CardEmulator::builder().settings(settings).build());

    let err = client
        .set_access_code(UserCode::new("123456"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::SettingUserCodeForbidden(UserCodeType::AccessCode)
    ));
    assert!(!card.access_code_set());

    // The passcode flag is independent.
    client
        .set_passcode(UserCode::new("654321"), None, None)
        .await
        .unwrap();
    assert!(card.passcode_set());
}

#[tokio::test]
async fn private_files_are_excluded_without_opt_in() {
    let (client, _card) = client_with_card(CardEmulator::new());

    let written = client
        .write_files(
            vec![
                FileToWrite::plain(Bytes::from_static(b"public")),
                FileToWrite::plain(Bytes::from_static(b"secret")),
            ],
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(written.indices, vec![0, 1]);

    client
        .change_file_settings(
            vec![FileSettingsChange {
                index: 1,
                settings: FileSettings {
                    visibility: FileVisibility::Private,
                },
            }],
            None,
            None,
        )
        .await
        .unwrap();

    let public_only = client.read_files(false, None, None, None).await.unwrap();
    assert_eq!(public_only.files.len(), 1);
    assert!(
        public_only
            .files
            .iter()
            .all(|file| file.settings.visibility != FileVisibility::Private)
    );

    let all = client.read_files(true, None, None, None).await.unwrap();
    assert_eq!(all.files.len(), 2);
}

#[tokio::test]
async fn file_index_selection_is_exact() {
    let (client, _card) = client_with_card(CardEmulator::new());

    client
        .write_files(vec![FileToWrite::plain(Bytes::from_static(b"a"))], None, None)
        .await
        .unwrap();

    let read = client
        .read_files(true, Some(vec![0]), None, None)
        .await
        .unwrap();
    assert_eq!(read.files.len(), 1);

    let err = client
        .read_files(true, Some(vec![0, 7]), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileIndexOutOfRange { index: 7 }));

    let err = client
        .delete_files(Some(vec![9]), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileIndexOutOfRange { index: 9 }));

    client.delete_files(None, None, None).await.unwrap();
    let read = client.read_files(true, None, None, None).await.unwrap();
    assert!(read.files.is_empty());
}

#[tokio::test]
async fn file_indices_are_finite() {
    let (client, _card) = client_with_card(CardEmulator::new());

    let batch: Vec<FileToWrite> = (0..=u8::MAX)
        .map(|_| FileToWrite::plain(Bytes::from_static(b"x")))
        .collect();
    let written = client.write_files(batch, None, None).await.unwrap();
    assert_eq!(written.indices.len(), 256);

    // Deleting everything frees storage but not lifetime indices.
    client.delete_files(None, None, None).await.unwrap();
    let err = client
        .write_files(vec![FileToWrite::plain(Bytes::from_static(b"y"))], None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileIndicesExhausted));
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
}

#[tokio::test]
async fn card_mismatch_is_reported() {
    let (client, _card) = client_with_card(CardEmulator::builder().card_id("CB01").build());

    let err = client
        .scan_card(Some(CardId::from("CB99")), None)
        .await
        .unwrap_err();
    match err {
        Error::CardMismatch { expected, found } => {
            assert_eq!(expected, CardId::from("CB99"));
            assert_eq!(found, CardId::from("CB01"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        client.scan_card(Some(CardId::from("CB99")), None).await.unwrap_err().kind(),
        ErrorKind::CardMismatch
    );
}

#[tokio::test]
async fn card_removal_cancels_operations() {
    let (client, card) = client_with_card(CardEmulator::new());

    card.set_present(false);
    let err = client.scan_card(None, None).await.unwrap_err();
    assert!(matches!(err, Error::UserCancelled));
    assert_eq!(err.kind(), ErrorKind::UserCancelled);

    card.set_present(true);
    client.scan_card(None, None).await.unwrap();
}

#[tokio::test]
async fn disabled_radio_gates_operations_until_enabled() {
    let (client, card) = client_with_card(
        CardEmulator::builder()
            .nfc_status(NfcStatus {
                enabled: false,
                support: true,
            })
            .build(),
    );

    assert_eq!(
        client.nfc_status(),
        NfcStatus {
            enabled: false,
            support: true,
        }
    );

    let err = client.scan_card(None, None).await.unwrap_err();
    assert!(matches!(err, Error::NfcDisabled));
    assert_eq!(err.kind(), ErrorKind::HardwareUnavailable);

    let receiver = client.nfc_state_receiver();
    card.set_nfc_enabled(true);

    let status = receiver.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(status.enabled);
    client.scan_card(None, None).await.unwrap();
}

#[tokio::test]
async fn nfc_subscription_drop_stops_delivery() {
    let (client, card) = client_with_card(CardEmulator::new());

    let seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let subscription = client.on_nfc_state_change(move |_| {
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    });

    card.set_nfc_enabled(false);
    assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 1);

    subscription.unsubscribe();
    card.set_nfc_enabled(true);
    assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn explicit_session_shares_one_handshake() {
    let (client, card) = client_with_card(CardEmulator::new());

    client.scan_card(None, None).await.unwrap();
    client.scan_card(None, None).await.unwrap();
    assert_eq!(card.handshake_count(), 2);

    client.start_session().await.unwrap();
    client.scan_card(None, None).await.unwrap();
    client.read_user_data(None, None).await.unwrap();
    client.stop_session().await;
    assert_eq!(card.handshake_count(), 3);

    // Stopping again is a no-op; the next lone operation handshakes anew.
    client.stop_session().await;
    client.scan_card(None, None).await.unwrap();
    assert_eq!(card.handshake_count(), 4);
}

#[tokio::test]
async fn concurrent_operations_serialize() {
    let (client, _card) = client_with_card(CardEmulator::new());
    let client = Arc::new(client);

    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.scan_card(None, None).await })
    };
    let second = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.read_user_data(None, None).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();
}

#[tokio::test]
async fn derivation_is_rejected_where_unsupported() {
    let (client, card) = client_with_card(
        CardEmulator::builder()
            .supported_curves(vec![EllipticCurve::Bls12381G2])
            .build(),
    );
    let card_id = card.card_id();

    let wallet = client
        .create_wallet(WalletConfig::new(EllipticCurve::Bls12381G2), None, None)
        .await
        .unwrap()
        .wallet;
    assert!(wallet.chain_code.is_none());

    let path: DerivationPath = "m/0/1".parse().unwrap();
    let err = client
        .sign(
            vec![Bytes::from_static(&[0x22; 32])],
            wallet.public_key,
            card_id,
            Some(path),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::DerivationNotSupported(EllipticCurve::Bls12381G2)
    ));
}
