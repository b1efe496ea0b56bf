//! Integration tests for device classification.


use hero_graphics::device::{
    classify, ConnectionInfo, DeviceProfile, DeviceSignals, EffectiveType, MotionFlag,
    RenderTier, SignalChange, TierClassifier, TierObserver,
};
use scene_fixtures::{desktop_signals, phone_signals};
use std::cell::RefCell;
use std::rc::Rc;

struct Recorder(Rc<RefCell<Vec<RenderTier>>>);

impl TierObserver for Recorder {
    fn tier_changed(&mut self, tier: RenderTier) {
        self.0.borrow_mut().push(tier);
    }
}

fn recording_classifier(signals: DeviceSignals) -> (TierClassifier, Rc<RefCell<Vec<RenderTier>>>) {
    let published = Rc::new(RefCell::new(Vec::new()));
    let mut classifier = TierClassifier::new(signals);
    classifier.subscribe(Box::new(Recorder(published.clone())));
    (classifier, published)
}

// ==================== Tier Rule ====================

#[test]
fn test_desktop_profile_is_full() {
    let (mut classifier, published) = recording_classifier(DeviceSignals::default());
    assert_eq!(classifier.update(desktop_signals()), Some(RenderTier::Full));
    assert_eq!(classifier.current(), RenderTier::Full);
    assert_eq!(*published.borrow(), vec![RenderTier::Full]);
}

#[test]
fn test_small_phone_is_fallback() {
    let (mut classifier, published) = recording_classifier(desktop_signals());
    classifier.evaluate();
    assert_eq!(classifier.update(phone_signals()), Some(RenderTier::Fallback));
    assert_eq!(
        *published.borrow(),
        vec![RenderTier::Full, RenderTier::Fallback]
    );
}

#[test]
fn test_phone_on_startup_stays_silent() {
    let (mut classifier, published) = recording_classifier(phone_signals());
    assert_eq!(classifier.evaluate(), None);
    assert_eq!(classifier.current(), RenderTier::Fallback);
    assert!(published.borrow().is_empty());
}

#[test]
fn test_tier_rule_over_profile_grid() {
    let memories = [2.0, 4.0, 4.5, 8.0];
    let cores = [2, 4, 5, 8];
    let types = [
        EffectiveType::Slow2g,
        EffectiveType::TwoG,
        EffectiveType::ThreeG,
        EffectiveType::FourG,
    ];

    for &memory_gb in &memories {
        for &core_count in &cores {
            for &effective_type in &types {
                for save_data in [false, true] {
                    for reduced_motion in [false, true] {
                        let profile = DeviceProfile {
                            viewport_width: 1440,
                            cores: core_count,
                            memory_gb,
                            effective_type,
                            save_data,
                            reduced_motion,
                        };
                        let low_end = reduced_motion
                            || memory_gb <= 4.0
                            || core_count <= 4
                            || save_data
                            || matches!(effective_type, EffectiveType::Slow2g | EffectiveType::TwoG);
                        let expected = if low_end {
                            RenderTier::Fallback
                        } else {
                            RenderTier::Full
                        };
                        assert_eq!(classify(&profile), expected, "{:?}", profile);
                    }
                }
            }
        }
    }
}

#[test]
fn test_viewport_width_alone_never_forces_fallback() {
    let signals = DeviceSignals {
        viewport_width: Some(320),
        ..desktop_signals()
    };
    assert_eq!(
        classify(&DeviceProfile::from_signals(&signals)),
        RenderTier::Full
    );
}

#[test]
fn test_missing_signals_default_to_full() {
    let profile = DeviceProfile::from_signals(&DeviceSignals::default());
    assert_eq!(profile.cores, 8);
    assert_eq!(profile.memory_gb, 8.0);
    assert_eq!(classify(&profile), RenderTier::Full);
}

// ==================== Publishing ====================

#[test]
fn test_before_first_update_reads_fallback() {
    let classifier = TierClassifier::new(desktop_signals());
    assert_eq!(classifier.current(), RenderTier::Fallback);
}

#[test]
fn test_unchanged_profile_publishes_once() {
    let (mut classifier, published) = recording_classifier(DeviceSignals::default());
    assert!(classifier.update(desktop_signals()).is_some());
    assert!(classifier.update(desktop_signals()).is_none());
    assert!(classifier.evaluate().is_none());
    assert_eq!(published.borrow().len(), 1);
}

#[test]
fn test_change_that_keeps_tier_is_silent() {
    let (mut classifier, published) = recording_classifier(desktop_signals());
    classifier.evaluate();
    assert!(classifier.apply(SignalChange::Viewport(900)).is_none());
    assert_eq!(published.borrow().len(), 1);
}

#[test]
fn test_reduced_motion_toggle_publishes_each_flip() {
    let (mut classifier, published) = recording_classifier(desktop_signals());
    classifier.evaluate();
    assert_eq!(
        classifier.apply(SignalChange::ReducedMotion(true)),
        Some(RenderTier::Fallback)
    );
    assert_eq!(
        classifier.apply(SignalChange::ReducedMotion(false)),
        Some(RenderTier::Full)
    );
    assert_eq!(
        *published.borrow(),
        vec![RenderTier::Full, RenderTier::Fallback, RenderTier::Full]
    );
}

#[test]
fn test_network_change_to_save_data() {
    let mut classifier = TierClassifier::new(desktop_signals());
    classifier.evaluate();
    let tier = classifier.apply(SignalChange::Connection(Some(ConnectionInfo {
        save_data: Some(true),
        effective_type: Some(EffectiveType::FourG),
    })));
    assert_eq!(tier, Some(RenderTier::Fallback));
}

#[test]
fn test_vendor_prefixed_connection_is_used() {
    let signals = DeviceSignals {
        connection: None,
        webkit_connection: Some(ConnectionInfo {
            save_data: None,
            effective_type: Some(EffectiveType::TwoG),
        }),
        ..desktop_signals()
    };
    let mut classifier = TierClassifier::new(desktop_signals());
    classifier.evaluate();
    assert_eq!(classifier.update(signals), Some(RenderTier::Fallback));
}

#[test]
fn test_motion_flag_mirrors_tier() {
    let mut classifier = TierClassifier::new(desktop_signals());
    assert!(classifier.motion_flag().reduced_motion());
    classifier.evaluate();
    assert_eq!(classifier.motion_flag().attribute_value(), "false");
    classifier.update(phone_signals());
    assert!(classifier.motion_flag().reduced_motion());
    assert_eq!(classifier.motion_flag().attribute_value(), "true");

    let mut flag = MotionFlag::default();
    flag.tier_changed(RenderTier::Full);
    assert_eq!(flag.attribute_value(), "false");
}

#[test]
fn test_signals_from_navigator_json() {
    let json = r#"{
        "viewportWidth": 1920,
        "hardwareConcurrency": 8,
        "deviceMemory": 8,
        "connection": {"saveData": false, "effectiveType": "4g"},
        "prefersReducedMotion": false
    }"#;
    let signals: DeviceSignals = serde_json::from_str(json).unwrap();
    let mut classifier = TierClassifier::new(signals);
    assert_eq!(classifier.evaluate(), Some(RenderTier::Full));
}
