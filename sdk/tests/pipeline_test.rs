#![cfg(test)]

use scriptgen::{generate_network, generate_records, GenError, RunSummary, Settings};
use std::{fs, path::Path};

const PING: &str = r#"package com.ankamagames.dofus.network.messages.common.basic
{
   import com.ankamagames.jerakine.network.ICustomDataInput;
   import com.ankamagames.jerakine.network.INetworkMessage;
   import com.ankamagames.jerakine.network.NetworkMessage;

   public class BasicPingMessage extends NetworkMessage implements INetworkMessage
   {
      public static const protocolId:uint = 182;

      public var quiet:Boolean = false;

      public function deserializeAs_BasicPingMessage(input:ICustomDataInput) : void
      {
         this.quiet = input.readBoolean();
      }
   }
}
"#;

const BROKEN: &str = r#"package com.ankamagames.dofus.network.messages.common.basic
{
   public class GhostMessage extends NetworkMessage implements INetworkMessage
   {
      public function deserializeAs_GhostMessage(input:ICustomDataInput) : void
      {
         this.ghost = input.readInt();
      }
   }
}
"#;

const POSITION: &str = r#"package com.ankamagames.dofus.network.types.game.context
{
   import com.ankamagames.jerakine.network.INetworkType;

   public class MapCoordinates implements INetworkType
   {
      public static const protocolId:uint = 174;

      public var worldX:int = 0;

      public var worldY:int = 0;

      public function deserializeAs_MapCoordinates(input:ICustomDataInput) : void
      {
         this.worldX = input.readShort();
         this.worldY = input.readShort();
      }
   }
}
"#;

const CHANNEL: &str = r#"package com.ankamagames.dofus.network.enums
{
   public class ChatChannelsMultiEnum
   {
      public static const CHANNEL_GLOBAL:uint = 0;
      public static const CHANNEL_TEAM:uint = 1;
   }
}
"#;

const AREA: &str = r#"package com.ankamagames.dofus.datacenter.world
{
   public class Area implements IDataCenter
   {
      public static const MODULE:String = "Areas";

      public var id:int;

      public var nameId:uint;

      public var superAreaId:int;

      private var _name:String;

      public function get name() : String
      {
         if(!this._name)
         {
            this._name = I18n.getText(this.nameId);
         }
         return this._name;
      }
   }
}
"#;

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn fixture() -> (tempfile::TempDir, Settings) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Input");
    let network = "scripts/com/ankamagames/dofus/network";

    write(&input, &format!("{}/messages/common/basic/BasicPingMessage.as", network), PING);
    write(&input, &format!("{}/messages/common/basic/GhostMessage.as", network), BROKEN);
    write(&input, &format!("{}/types/game/context/MapCoordinates.as", network), POSITION);
    write(&input, &format!("{}/enums/ChatChannelsMultiEnum.as", network), CHANNEL);
    write(&input, &format!("{}/MessageReceiver.as", network), "_messagesTypes[1820] = BasicPingMessage;\n");
    write(&input, "scripts/com/ankamagames/dofus/datacenter/world/Area.as", AREA);

    let settings = Settings {
        input: input.clone(),
        output: dir.path().join("Output"),
        ..Settings::default()
    };
    (dir, settings)
}

#[test]
fn network_run_generates_every_family() {
    let (_dir, settings) = fixture();
    fs::create_dir_all(settings.output.join("Leftover")).unwrap();

    let summary = generate_network(&settings).unwrap();
    assert_eq!(summary.family("Messages").map(|f| (f.generated, f.skipped)), Some((1, 1)));
    assert_eq!(summary.family("Types").map(|f| f.generated), Some(1));
    assert_eq!(summary.family("Enums").map(|f| f.generated), Some(1));
    assert_eq!(summary.generated(), 3);
    assert!(!settings.output.join("Leftover").exists());

    let ping = fs::read_to_string(settings.output.join("Messages/Common/Basic/BasicPingMessage.cs")).unwrap();
    assert!(ping.contains("public const uint Id = 1820;"));
    assert!(ping.contains("writer.WriteBoolean(quiet);"));

    let coordinates = fs::read_to_string(settings.output.join("Types/Game/Context/MapCoordinates.cs")).unwrap();
    assert!(coordinates.contains("public const short Id = 174;"));
    assert!(coordinates.contains("worldY = reader.ReadShort();"));

    let channels = fs::read_to_string(settings.output.join("Enums/ChatChannelsMultiEnum.cs")).unwrap();
    assert!(channels.contains("CHANNEL_TEAM = 1"));
}

#[test]
fn record_run_writes_data_center_classes() {
    let (_dir, settings) = fixture();
    let summary = generate_records(&settings).unwrap();
    assert_eq!(summary.generated(), 1);
    assert_eq!(summary.skipped(), 0);

    let area = fs::read_to_string(
        settings
            .output
            .join("DataCenter/com/ankamagames/dofus/datacenter/world/Area.cs"),
    )
    .unwrap();
    assert!(area.contains("public class Area : IDataObject, IIndexedData"));
    assert!(area.contains("[I18NField]"));
    assert!(area.contains("get { return (int)id; }"));
    assert!(area.contains("public int SuperAreaId"));
}

#[test]
fn missing_input_is_created_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        input: dir.path().join("Nothing"),
        output: dir.path().join("Output"),
        ..Settings::default()
    };

    let summary = generate_network(&settings).unwrap();
    assert_eq!(summary, RunSummary::default());
    assert!(settings.input.is_dir());
    assert!(!settings.output.exists());

    fs::remove_dir(&settings.input).unwrap();
    let summary = generate_records(&settings).unwrap();
    assert_eq!(summary.generated(), 0);
    assert!(settings.input.is_dir());
}

#[test]
fn input_inside_output_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        input: dir.path().join("Output/Input"),
        output: dir.path().join("Output"),
        ..Settings::default()
    };
    assert!(matches!(generate_records(&settings), Err(GenError::OutputOverlapsInput(_))));
    assert!(!settings.input.exists());
}

#[test]
fn settings_json_overrides_defaults() {
    let settings = Settings::from_json(r#"{ "output": "Gen", "generator": { "namespaces": { "enums": "Game.Enums" } } }"#).unwrap();
    assert_eq!(settings.output, Path::new("Gen"));
    assert_eq!(settings.input, Path::new("./Input"));
    assert_eq!(settings.generator.namespaces.enums, "Game.Enums");
    assert_eq!(settings.layout.extension, "as");
}
