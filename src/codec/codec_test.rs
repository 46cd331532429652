use super::*;

fn capability(mime_type: &str, clock_rate: u32, sdp_fmtp_line: &str) -> RTCRtpCodecCapability {
    RTCRtpCodecCapability {
        mime_type: mime_type.to_owned(),
        clock_rate,
        channels: 0,
        sdp_fmtp_line: sdp_fmtp_line.to_owned(),
    }
}

fn video_capabilities() -> Vec<RTCRtpCodecCapability> {
    vec![
        capability(MIME_TYPE_VP8, 90000, ""),
        capability(
            MIME_TYPE_H264,
            90000,
            "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42001f",
        ),
        capability(
            MIME_TYPE_H264,
            90000,
            "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f",
        ),
        capability(MIME_TYPE_VP9, 90000, "profile-id=0"),
        capability(MIME_TYPE_VP9, 90000, "profile-id=2"),
    ]
}

#[test]
fn test_select_video_codec_case_insensitive() {
    let selected = select_codec(TrackKind::Video, &video_capabilities(), "vp8", None);
    assert_eq!(selected, Some(capability(MIME_TYPE_VP8, 90000, "")));

    let selected = select_codec(TrackKind::Video, &video_capabilities(), "h264", None);
    assert_eq!(
        selected.map(|c| c.sdp_fmtp_line),
        Some("level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42001f".to_owned())
    );
}

#[test]
fn test_select_video_codec_with_profile() {
    let tests = vec![
        ("h264", "42e01f", "profile-level-id=42e01f"),
        ("vp9", "profile-id=2", "profile-id=2"),
        // unknown profile falls back to the first entry of the codec
        ("vp9", "profile-id=3", "profile-id=0"),
    ];

    for (codec, profile, expected_fmtp) in tests {
        let selected = select_codec(TrackKind::Video, &video_capabilities(), codec, Some(profile))
            .expect("codec family present");
        assert!(
            selected.sdp_fmtp_line.ends_with(expected_fmtp),
            "codec {codec} profile {profile}: got {}",
            selected.sdp_fmtp_line
        );
    }
}

#[test]
fn test_select_video_codec_missing_family() {
    assert_eq!(
        select_codec(TrackKind::Video, &video_capabilities(), "av1", None),
        None
    );
    assert_eq!(
        select_codec(TrackKind::Video, &video_capabilities(), "av1", Some("profile=0")),
        None
    );
    assert_eq!(select_codec(TrackKind::Video, &[], "vp8", None), None);
}

#[test]
fn test_select_audio_codec_falls_back_to_opus() {
    let capabilities = vec![
        capability(MIME_TYPE_PCMU, 8000, ""),
        capability(MIME_TYPE_OPUS, 48000, "minptime=10;useinbandfec=1"),
        capability(MIME_TYPE_G722, 8000, ""),
    ];

    // the configured codec is a video codec, so Opus is the only match
    let selected = select_codec(TrackKind::Audio, &capabilities, "vp8", None);
    assert_eq!(selected.map(|c| c.mime_type), Some(MIME_TYPE_OPUS.to_owned()));

    // an audio codec that is listed first wins over Opus
    let selected = select_codec(TrackKind::Audio, &capabilities, "pcmu", None);
    assert_eq!(selected.map(|c| c.mime_type), Some(MIME_TYPE_PCMU.to_owned()));

    let selected = select_codec(
        TrackKind::Audio,
        &[capability(MIME_TYPE_PCMA, 8000, "")],
        "vp8",
        None,
    );
    assert_eq!(selected, None);
}

#[test]
fn test_select_codec_unspecified_kind() {
    assert_eq!(
        select_codec(TrackKind::Unspecified, &video_capabilities(), "vp8", None),
        None
    );
}
