//! Kdenlive (MLT) timeline document.
//!
//! The finished session timeline is turned into a typed MLT graph first and
//! serialised second, so the structure can be inspected in tests without
//! string matching.
//!
//! # Layout
//!
//! ```text
//! producers   frame{i} webcam{i} deskshare{i} audiotrack{i}
//! main_bin    one entry per producer
//! playlist0   slides          ─┐
//! playlist1   audio            │  each wrapped in a tractor with the
//! deskshare…  per stream       │  empty playlist2 as hidden second track
//! webcam…     per stream      ─┘
//! tractor2    slides, audio, screen shares, webcams (bottom to top)
//! ```

use std::fmt::Write as _;

use quick_xml::escape::escape;

use slidecast_common::clock::format_timecode;
use slidecast_common::config::TimelineProfile;
use slidecast_engine::timeline::SessionTimeline;
use slidecast_model::segment::MediaSegment;

/// A named MLT property; `None` renders as an empty element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: Option<String>,
}

impl Property {
    pub fn new(name: &str, value: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Producer {
    pub id: String,
    pub length_ms: u64,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistItem {
    Blank { length_ms: u64 },
    Entry { producer: String, length_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub properties: Vec<Property>,
    pub items: Vec<PlaylistItem>,
}

impl Playlist {
    /// Total playing time, blanks included.
    pub fn duration_ms(&self) -> u64 {
        self.items
            .iter()
            .map(|item| match item {
                PlaylistItem::Blank { length_ms } | PlaylistItem::Entry { length_ms, .. } => {
                    *length_ms
                }
            })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub producer: String,
    pub hidden: bool,
}

/// A transition or filter service attached to a tractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: String,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tractor {
    pub id: String,
    pub global_feed: bool,
    pub out_ms: u64,
    pub properties: Vec<Property>,
    pub tracks: Vec<Track>,
    pub transitions: Vec<Service>,
    pub filters: Vec<Service>,
}

/// Complete MLT document for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineDocument {
    pub root: String,
    pub profile: TimelineProfile,
    pub producers: Vec<Producer>,
    pub playlists: Vec<Playlist>,
    pub tractors: Vec<Tractor>,
}

const MLT_VERSION: &str = "6.22.1";
const KDENLIVE_VERSION: &str = "20.08.0";
const EMPTY_PLAYLIST: &str = "playlist2";

impl TimelineDocument {
    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    pub fn tractor(&self, id: &str) -> Option<&Tractor> {
        self.tractors.iter().find(|t| t.id == id)
    }

    pub fn producer(&self, id: &str) -> Option<&Producer> {
        self.producers.iter().find(|p| p.id == id)
    }

    /// Serialise to MLT XML.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version='1.0' encoding='utf-8'?>\n");
        let _ = writeln!(
            out,
            r#"<mlt LC_NUMERIC="C" producer="main_bin" version="{MLT_VERSION}" root="{}">"#,
            escape(self.root.as_str())
        );
        write_profile(&mut out, &self.profile);
        for producer in &self.producers {
            write_producer(&mut out, producer);
        }
        for playlist in &self.playlists {
            write_playlist(&mut out, playlist);
        }
        for tractor in &self.tractors {
            write_tractor(&mut out, tractor);
        }
        out.push_str("</mlt>\n");
        out
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a.max(1)
    } else {
        gcd(b, a % b)
    }
}

fn write_profile(out: &mut String, profile: &TimelineProfile) {
    let divisor = gcd(profile.width, profile.height);
    let _ = writeln!(
        out,
        r#" <profile frame_rate_num="{}" sample_aspect_num="1" display_aspect_den="{}" colorspace="709" progressive="1" description="{}" display_aspect_num="{}" frame_rate_den="1" width="{}" height="{}" sample_aspect_den="1"/>"#,
        profile.fps,
        profile.height / divisor,
        escape(profile.description.as_str()),
        profile.width / divisor,
        profile.width,
        profile.height
    );
}

fn write_properties(out: &mut String, indent: &str, properties: &[Property]) {
    for property in properties {
        match &property.value {
            Some(value) => {
                let _ = writeln!(
                    out,
                    r#"{indent}<property name="{}">{}</property>"#,
                    escape(property.name.as_str()),
                    escape(value.as_str())
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    r#"{indent}<property name="{}"/>"#,
                    escape(property.name.as_str())
                );
            }
        }
    }
}

fn write_producer(out: &mut String, producer: &Producer) {
    let _ = writeln!(
        out,
        r#" <producer id="{}" in="{}" out="{}">"#,
        producer.id,
        format_timecode(0),
        format_timecode(producer.length_ms)
    );
    write_properties(out, "  ", &producer.properties);
    out.push_str(" </producer>\n");
}

fn write_playlist(out: &mut String, playlist: &Playlist) {
    if playlist.properties.is_empty() && playlist.items.is_empty() {
        let _ = writeln!(out, r#" <playlist id="{}"/>"#, playlist.id);
        return;
    }
    let _ = writeln!(out, r#" <playlist id="{}">"#, playlist.id);
    write_properties(out, "  ", &playlist.properties);
    for item in &playlist.items {
        match item {
            PlaylistItem::Blank { length_ms } => {
                let _ = writeln!(out, r#"  <blank length="{}"/>"#, format_timecode(*length_ms));
            }
            PlaylistItem::Entry {
                producer,
                length_ms,
            } => {
                let _ = writeln!(
                    out,
                    r#"  <entry producer="{producer}" in="{}" out="{}"/>"#,
                    format_timecode(0),
                    format_timecode(*length_ms)
                );
            }
        }
    }
    out.push_str(" </playlist>\n");
}

fn write_tractor(out: &mut String, tractor: &Tractor) {
    let feed = if tractor.global_feed {
        r#" global_feed="1""#
    } else {
        ""
    };
    let _ = writeln!(
        out,
        r#" <tractor id="{}"{feed} in="{}" out="{}">"#,
        tractor.id,
        format_timecode(0),
        format_timecode(tractor.out_ms)
    );
    write_properties(out, "  ", &tractor.properties);
    for track in &tractor.tracks {
        if track.hidden {
            let _ = writeln!(out, r#"  <track hide="both" producer="{}"/>"#, track.producer);
        } else {
            let _ = writeln!(out, r#"  <track producer="{}"/>"#, track.producer);
        }
    }
    for (tag, services) in [("transition", &tractor.transitions), ("filter", &tractor.filters)] {
        for service in services {
            let _ = writeln!(out, r#"  <{tag} id="{}">"#, service.id);
            write_properties(out, "   ", &service.properties);
            let _ = writeln!(out, "  </{tag}>");
        }
    }
    out.push_str(" </tractor>\n");
}

/// Build the MLT graph of a finished session.
///
/// `root` is the recording directory all resources are relative to.
pub fn assemble(timeline: &SessionTimeline, profile: &TimelineProfile, root: &str) -> TimelineDocument {
    let session = timeline.length_ms;
    let mut producers = Vec::new();

    for (i, frame) in timeline.frames.iter().enumerate() {
        let mut properties = media_properties(frame, profile);
        properties.push(Property::new("mlt_service", "qimage"));
        properties.push(Property::new("global_feed", 1));
        producers.push(Producer {
            id: format!("frame{i}"),
            length_ms: frame.length_ms,
            properties,
        });
    }
    for (i, webcam) in timeline.webcams.iter().enumerate() {
        let mut properties = media_properties(webcam, profile);
        if let Some(label) = &webcam.label {
            properties.push(Property::new("kdenlive:clipname", label));
        }
        properties.push(Property::new("mlt_service", "avformat"));
        properties.push(Property::new("global_feed", 1));
        producers.push(Producer {
            id: format!("webcam{i}"),
            length_ms: webcam.length_ms,
            properties,
        });
    }
    for (i, share) in timeline.screenshares.iter().enumerate() {
        let mut properties = media_properties(share, profile);
        properties.push(Property::new("mlt_service", "avformat"));
        properties.push(Property::new("global_feed", 1));
        producers.push(Producer {
            id: format!("deskshare{i}"),
            length_ms: share.length_ms,
            properties,
        });
    }
    for (i, audio) in timeline.audio.iter().enumerate() {
        producers.push(Producer {
            id: format!("audiotrack{i}"),
            length_ms: audio.length_ms,
            properties: audio_properties(audio),
        });
    }

    let mut playlists = vec![main_bin(timeline, profile)];

    let mut slides = Playlist {
        id: "playlist0".to_string(),
        properties: Vec::new(),
        items: Vec::new(),
    };
    fill_lane(&mut slides.items, "frame", indexed(&timeline.frames), session);
    playlists.push(slides);

    let mut audio = Playlist {
        id: "playlist1".to_string(),
        properties: vec![Property::new("kdenlive:audio_track", 1)],
        items: Vec::new(),
    };
    fill_lane(&mut audio.items, "audiotrack", indexed(&timeline.audio), session);
    playlists.push(audio);

    let share_lanes = lanes(&timeline.screenshares);
    for (j, lane) in share_lanes.iter().enumerate() {
        let mut playlist = Playlist {
            id: format!("deskshareplaylist{j}"),
            properties: Vec::new(),
            items: Vec::new(),
        };
        fill_lane(&mut playlist.items, "deskshare", lane.clone(), session);
        playlists.push(playlist);
    }

    let webcam_lanes = lanes(&timeline.webcams);
    for (j, lane) in webcam_lanes.iter().enumerate() {
        let mut playlist = Playlist {
            id: format!("webcamplaylist{j}"),
            properties: Vec::new(),
            items: Vec::new(),
        };
        fill_lane(&mut playlist.items, "webcam", lane.clone(), session);
        playlists.push(playlist);
    }

    playlists.push(Playlist {
        id: EMPTY_PLAYLIST.to_string(),
        properties: Vec::new(),
        items: Vec::new(),
    });

    let mut tractors = Vec::new();
    for j in 0..share_lanes.len() {
        tractors.push(track_tractor(
            format!("desksharetractor{j}"),
            format!("deskshareplaylist{j}"),
            false,
            session,
        ));
    }
    for j in 0..webcam_lanes.len() {
        tractors.push(track_tractor(
            format!("webcamtractor{j}"),
            format!("webcamplaylist{j}"),
            false,
            session,
        ));
    }
    tractors.push(track_tractor(
        "tractor0".to_string(),
        "playlist0".to_string(),
        false,
        session,
    ));
    tractors.push(track_tractor(
        "tractor1".to_string(),
        "playlist1".to_string(),
        true,
        session,
    ));

    let mut stack = vec![plain_track("tractor0"), plain_track("tractor1")];
    stack.extend((0..share_lanes.len()).map(|j| plain_track(&format!("desksharetractor{j}"))));
    stack.extend((0..webcam_lanes.len()).map(|j| plain_track(&format!("webcamtractor{j}"))));
    tractors.push(Tractor {
        id: "tractor2".to_string(),
        global_feed: true,
        out_ms: session,
        properties: Vec::new(),
        tracks: stack,
        transitions: vec![blend_transition()],
        filters: audio_filters(),
    });

    tracing::debug!(
        producers = producers.len(),
        playlists = playlists.len(),
        tractors = tractors.len(),
        "Assembled timeline document"
    );

    TimelineDocument {
        root: root.to_string(),
        profile: profile.clone(),
        producers,
        playlists,
        tractors,
    }
}

fn media_properties(segment: &MediaSegment, profile: &TimelineProfile) -> Vec<Property> {
    vec![
        Property::new("length", format_timecode(segment.length_ms)),
        Property::new("eof", "pause"),
        Property::new("resource", &segment.resource),
        Property::new("ttl", profile.fps),
        Property::new("aspect_ratio", 1),
        Property::new("progressive", 1),
        Property::new("seekable", 1),
        Property::new("meta.media.width", profile.width),
        Property::new("meta.media.height", profile.height),
    ]
}

fn audio_properties(segment: &MediaSegment) -> Vec<Property> {
    vec![
        Property::new("resource", &segment.resource),
        Property::new("meta.media.nb_streams", 1),
        Property::new("meta.media.0.stream.type", "audio"),
        Property::new("meta.media.0.codec.sample_fmt", "fltp"),
        Property::new("meta.media.0.codec.sample_rate", 48000),
        Property::new("meta.media.0.codec.channels", 1),
        Property::new("meta.media.0.codec.name", "opus"),
        Property::new("meta.media.0.codec.long_name", "Opus"),
        Property::new("meta.media.0.codec.bit_rate", 0),
        Property::new("meta.attr.0.stream.METADATA.markup", "Freeswitch/mod_opusfile"),
        Property::new("eof", "pause"),
        Property::new("seekable", 1),
        Property::new("mute_on_pause", 1),
        Property::new("mlt_service", "avformat"),
        Property::new("global_feed", 1),
    ]
}

fn main_bin(timeline: &SessionTimeline, profile: &TimelineProfile) -> Playlist {
    let doc = |name: &str, value: &dyn ToString| {
        Property::new(&format!("kdenlive:docproperties.{name}"), value.to_string())
    };
    let doc_empty = |name: &str| Property::empty(&format!("kdenlive:docproperties.{name}"));

    let properties = vec![
        doc("activeTrack", &0),
        doc("audioChannels", &2),
        doc("audioTarget", &0),
        doc("disablepreview", &0),
        doc("enableTimelineZone", &0),
        doc("enableexternalproxy", &0),
        doc("enableproxy", &0),
        doc_empty("externalproxyparams"),
        doc("generateimageproxy", &0),
        doc("generateproxy", &0),
        doc("kdenliveversion", &KDENLIVE_VERSION),
        doc("position", &0),
        doc_empty("previewextension"),
        doc_empty("previewparameters"),
        doc("profile", &profile.profile_name),
        doc("proxyextension", &"mkv"),
        doc("proxyimageminsize", &2000),
        doc("proxyimagesize", &800),
        doc("proxyminsize", &1000),
        doc(
            "proxyparams",
            &"-vf yadif,scale=960:-2 -qscale 3 -vcodec mjpeg -acodec pcm_s16le",
        ),
        doc("scrollPos", &0),
        doc("seekOffset", &30000),
        doc("version", &1),
        doc("verticalzoom", &1),
        doc("videoTarget", &0),
        doc("zonein", &0),
        doc("zoneout", &75),
        doc("zoom", &8),
        Property::empty("kdenlive:expandedFolders"),
        Property::empty("kdenlive:documentnotes"),
        Property::new("xml_retain", 1),
    ];

    let mut items = Vec::new();
    for (prefix, segments) in [
        ("frame", &timeline.frames),
        ("audiotrack", &timeline.audio),
        ("webcam", &timeline.webcams),
        ("deskshare", &timeline.screenshares),
    ] {
        items.extend(segments.iter().enumerate().map(|(i, s)| PlaylistItem::Entry {
            producer: format!("{prefix}{i}"),
            length_ms: s.length_ms,
        }));
    }

    Playlist {
        id: "main_bin".to_string(),
        properties,
        items,
    }
}

type IndexedLane<'a> = Vec<(usize, &'a MediaSegment)>;

fn indexed(segments: &[MediaSegment]) -> IndexedLane<'_> {
    segments.iter().enumerate().collect()
}

/// Segments grouped per stream key, keeping their producer index.
fn lanes(segments: &[MediaSegment]) -> Vec<IndexedLane<'_>> {
    let mut keys: Vec<&str> = Vec::new();
    let mut grouped: Vec<IndexedLane<'_>> = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        match keys.iter().position(|k| *k == segment.key) {
            Some(at) => grouped[at].push((i, segment)),
            None => {
                keys.push(&segment.key);
                grouped.push(vec![(i, segment)]);
            }
        }
    }
    grouped
}

/// Blanks up to each segment start, then the segment itself. An empty lane
/// is one blank spanning the session.
fn fill_lane(items: &mut Vec<PlaylistItem>, prefix: &str, lane: IndexedLane<'_>, session_ms: u64) {
    if lane.is_empty() {
        items.push(PlaylistItem::Blank {
            length_ms: session_ms,
        });
        return;
    }

    let mut cursor = 0;
    for (position, (index, segment)) in lane.into_iter().enumerate() {
        let gap = segment.start_ms.saturating_sub(cursor);
        if position == 0 || gap > 0 {
            items.push(PlaylistItem::Blank { length_ms: gap });
        }
        items.push(PlaylistItem::Entry {
            producer: format!("{prefix}{index}"),
            length_ms: segment.length_ms,
        });
        cursor = cursor.max(segment.end_ms());
    }
}

fn track_tractor(id: String, playlist: String, audio: bool, session_ms: u64) -> Tractor {
    Tractor {
        id,
        global_feed: false,
        out_ms: session_ms,
        properties: vec![
            Property::new("kdenlive:audio_track", u8::from(audio)),
            Property::new("kdenlive:trackheight", 69),
            Property::new("kdenlive:collapsed", 0),
            Property::empty("kdenlive:thumbs_format"),
            Property::empty("kdenlive:audio_rec"),
            Property::new("kdenlive:timeline_active", 1),
        ],
        tracks: vec![
            plain_track(&playlist),
            Track {
                producer: EMPTY_PLAYLIST.to_string(),
                hidden: true,
            },
        ],
        transitions: Vec::new(),
        filters: Vec::new(),
    }
}

fn plain_track(producer: &str) -> Track {
    Track {
        producer: producer.to_string(),
        hidden: false,
    }
}

fn blend_transition() -> Service {
    Service {
        id: "transition0".to_string(),
        properties: vec![
            Property::new("a_track", 0),
            Property::new("b_track", 1),
            Property::new("compositing", 0),
            Property::new("distort", 0),
            Property::new("rotate_center", 0),
            Property::new("mlt_service", "qtblend"),
            Property::new("kdenlive_id", "qtblend"),
            Property::new("internal_added", 237),
            Property::new("always_active", 1),
        ],
    }
}

fn audio_filters() -> Vec<Service> {
    vec![
        Service {
            id: "filter0".to_string(),
            properties: vec![
                Property::new("window", 75),
                Property::new("max_gain", "20dB"),
                Property::new("mlt_service", "volume"),
                Property::new("internal_added", 237),
                Property::new("disable", 1),
            ],
        },
        Service {
            id: "filter1".to_string(),
            properties: vec![
                Property::new("channel", -1),
                Property::new("mlt_service", "panner"),
                Property::new("internal_added", 237),
                Property::new("start", 0.5),
                Property::new("disable", 1),
            ],
        },
        Service {
            id: "filter2".to_string(),
            properties: vec![
                Property::new("iec_scale", 0),
                Property::new("mlt_service", "audiolevel"),
                Property::new("disable", 1),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use slidecast_model::segment::SegmentKind;

    fn segment(kind: SegmentKind, key: &str, start_ms: u64, length_ms: u64) -> MediaSegment {
        MediaSegment {
            kind,
            key: key.to_string(),
            resource: format!("{}/{key}", kind.as_str()),
            label: (kind == SegmentKind::Webcam).then(|| "Alice".to_string()),
            start_ms,
            length_ms,
        }
    }

    fn timeline() -> SessionTimeline {
        SessionTimeline {
            started_at_ms: 1_600_000_000_000,
            length_ms: 60_000,
            frames: vec![
                segment(SegmentKind::Frame, "", 2_000, 10_000),
                segment(SegmentKind::Frame, "", 12_000, 48_000),
            ],
            audio: vec![segment(SegmentKind::Audio, "", 0, 60_000)],
            webcams: vec![
                segment(SegmentKind::Webcam, "cam.webm", 5_000, 5_000),
                segment(SegmentKind::Webcam, "cam.webm", 20_000, 10_000),
            ],
            screenshares: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    #[test]
    fn test_leading_blank_and_gaps() {
        let doc = assemble(&timeline(), &TimelineProfile::default(), "/rec");
        let slides = doc.playlist("playlist0").unwrap();
        assert_eq!(slides.items[0], PlaylistItem::Blank { length_ms: 2_000 });
        assert_eq!(slides.items.len(), 3);

        let webcam = doc.playlist("webcamplaylist0").unwrap();
        assert_eq!(
            webcam.items,
            vec![
                PlaylistItem::Blank { length_ms: 5_000 },
                PlaylistItem::Entry {
                    producer: "webcam0".to_string(),
                    length_ms: 5_000
                },
                PlaylistItem::Blank { length_ms: 10_000 },
                PlaylistItem::Entry {
                    producer: "webcam1".to_string(),
                    length_ms: 10_000
                },
            ]
        );
        assert!(doc.playlist("webcamplaylist1").is_none());
    }

    #[test]
    fn test_missing_kind_is_one_session_blank() {
        let mut input = timeline();
        input.audio.clear();
        let doc = assemble(&input, &TimelineProfile::default(), "/rec");
        assert_eq!(
            doc.playlist("playlist1").unwrap().items,
            vec![PlaylistItem::Blank { length_ms: 60_000 }]
        );
        assert!(doc.playlist("deskshareplaylist0").is_none());
    }

    #[test]
    fn test_stacking_order() {
        let doc = assemble(&timeline(), &TimelineProfile::default(), "/rec");
        let stack: Vec<_> = doc
            .tractor("tractor2")
            .unwrap()
            .tracks
            .iter()
            .map(|t| t.producer.as_str())
            .collect();
        assert_eq!(stack, vec!["tractor0", "tractor1", "webcamtractor0"]);
    }

    #[test]
    fn test_webcam_producer_carries_presenter() {
        let doc = assemble(&timeline(), &TimelineProfile::default(), "/rec");
        let webcam = doc.producer("webcam1").unwrap();
        assert!(webcam
            .properties
            .contains(&Property::new("kdenlive:clipname", "Alice")));
        assert!(webcam
            .properties
            .contains(&Property::new("resource", "webcam/cam.webm")));
    }

    #[test]
    fn test_xml_shape() {
        let xml = assemble(&timeline(), &TimelineProfile::default(), "/rec & co").to_xml();
        assert!(xml.starts_with("<?xml version='1.0' encoding='utf-8'?>\n<mlt LC_NUMERIC=\"C\""));
        assert!(xml.contains(r#"root="/rec &amp; co""#));
        assert!(xml.contains(r#"display_aspect_num="16""#));
        assert!(xml.contains(r#"display_aspect_den="9""#));
        assert!(xml.contains(r#"<producer id="frame1" in="00:00:00.000" out="00:00:48.000">"#));
        assert!(xml.contains(r#"<blank length="00:00:02.000"/>"#));
        assert!(xml.contains(r#"<property name="kdenlive:docproperties.externalproxyparams"/>"#));
        assert!(xml.contains(r#"<track hide="both" producer="playlist2"/>"#));
        assert!(xml.contains(r#"<tractor id="tractor2" global_feed="1" in="00:00:00.000" out="00:01:00.000">"#));
        assert!(xml.contains(r#" <playlist id="playlist2"/>"#));
        assert!(xml.trim_end().ends_with("</mlt>"));
    }

    proptest! {
        #[test]
        fn prop_lane_never_exceeds_session(
            spans in proptest::collection::vec((0u64..10_000, 0u64..10_000), 1..8),
        ) {
            let mut start = 0;
            let mut segments = Vec::new();
            for (gap, length) in spans {
                start += gap;
                segments.push(segment(SegmentKind::Screenshare, "ds.webm", start, length));
                start += length;
            }
            let session = start;
            let mut items = Vec::new();
            fill_lane(&mut items, "deskshare", indexed(&segments), session);
            let playlist = Playlist { id: "p".to_string(), properties: Vec::new(), items };
            prop_assert_eq!(playlist.duration_ms(), session);
        }
    }
}
