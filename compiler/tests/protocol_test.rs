#![cfg(test)]

use scriptgen_compiler::{
    codec::{decode, encode, CodecEnv},
    generate_protocol_class,
    ir::{MethodType, VarType},
    parse_protocol_class,
    plan::SerializationPlan,
    ClassTable, Family, GenContext, GeneratorConfig, IdRegistry,
};
use scriptgen_wire::Value;
use std::fs;

const CHARACTER_STATS: &str = r#"package com.ankamagames.dofus.network.messages.game.character.stats
{
   import com.ankamagames.dofus.network.types.game.character.CharacterMinimalInformations;
   import com.ankamagames.jerakine.network.ICustomDataInput;
   import com.ankamagames.jerakine.network.INetworkMessage;
   import com.ankamagames.jerakine.network.NetworkMessage;
   import com.ankamagames.jerakine.network.utils.BooleanByteWrapper;
   import flash.utils.ByteArray;

   public class CharacterStatsMessage extends NetworkMessage implements INetworkMessage
   {
      public static const protocolId:uint = 500;

      public var level:uint = 0;

      public var infos:CharacterMinimalInformations;

      public var spells:Vector.<uint>;

      public var sitting:Boolean = false;

      public function deserializeAs_CharacterStatsMessage(input:ICustomDataInput) : void
      {
         var _val3:uint = 0;
         var _box0:uint = input.readByte();
         this.sitting = BooleanByteWrapper.getFlag(_box0,0);
         this.level = input.readVarUhShort();
         if(this.level < 0)
         {
            throw new Error("Forbidden value (" + this.level + ") on element of CharacterStatsMessage.level.");
         }
         this.infos = new CharacterMinimalInformations();
         this.infos.deserialize(input);
         var _spellsLen:uint = input.readUnsignedShort();
         for(var _i3:uint = 0; _i3 < _spellsLen; _i3++)
         {
            _val3 = input.readVarUhInt();
            this.spells.push(_val3);
         }
      }
   }
}
"#;

const CHARACTER_MINIMAL: &str = r#"package com.ankamagames.dofus.network.types.game.character
{
   import com.ankamagames.jerakine.network.ICustomDataInput;
   import com.ankamagames.jerakine.network.INetworkType;

   public class CharacterMinimalInformations implements INetworkType
   {
      public static const protocolId:uint = 110;

      public var id:Number = 0;

      public var name:String = "";

      public function deserializeAs_CharacterMinimalInformations(input:ICustomDataInput) : void
      {
         this.id = input.readVarUhLong();
         this.name = input.readUTF();
      }
   }
}
"#;

#[test]
fn parsed_message_round_trips_through_the_codec() {
    let config = GeneratorConfig::default();
    let classes = vec![
        parse_protocol_class(CHARACTER_STATS, &config).expect("message parses"),
        parse_protocol_class(CHARACTER_MINIMAL, &config).expect("type parses"),
    ];
    let table = ClassTable::new(&classes);
    let ids = IdRegistry::default();
    let env = CodecEnv::new(&table, &ids, &config);

    let names: Vec<&str> = classes[0].variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["sitting", "level", "infos", "spells"]);
    assert_eq!(classes[0].variables[3].method_type, MethodType::VectorPrimitive);
    assert_eq!(classes[1].variables[0].name, "objectId");

    let value = Value::object(
        "CharacterStatsMessage",
        vec![
            ("sitting", Value::Bool(true)),
            ("level", Value::UInt(300)),
            (
                "infos",
                Value::object(
                    "CharacterMinimalInformations",
                    vec![("objectId", Value::UInt(7)), ("name", Value::String("x".to_string()))],
                ),
            ),
            ("spells", Value::Array(vec![Value::UInt(1), Value::UInt(200)])),
        ],
    );

    let bytes = encode(&value, "CharacterStatsMessage", &env).unwrap();
    assert_eq!(bytes, vec![0x01, 0xAC, 0x02, 0x07, 0x00, 0x01, b'x', 0x00, 0x02, 0x01, 0xC8, 0x01]);
    assert_eq!(decode(&bytes, "CharacterStatsMessage", &env).unwrap(), value);
}

#[test]
fn generated_message_matches_the_plan() {
    let config = GeneratorConfig::default();
    let classes = vec![
        parse_protocol_class(CHARACTER_STATS, &config).unwrap(),
        parse_protocol_class(CHARACTER_MINIMAL, &config).unwrap(),
    ];
    let table = ClassTable::new(&classes);
    let mut ids = IdRegistry::default();
    ids.parse_message_ids("_messagesTypes[5001] = CharacterStatsMessage;");
    let ctx = GenContext {
        config: &config,
        ids:    &ids,
        table:  &table,
    };

    let plan = SerializationPlan::build(&classes[0], &config);
    assert_eq!(plan.flag_flushes(), 1);
    assert!(!plan.calls_base());

    let code = generate_protocol_class(&classes[0], Family::Message, &ctx);
    assert!(code.contains("namespace Nex.Protocol.Messages"));
    assert!(code.contains("public class CharacterStatsMessage : Message"));
    assert!(code.contains("public const uint Id = 5001;"));
    assert!(code.contains("public IEnumerable<uint> spells { get; set; }"));
    assert!(code.contains(
        "public CharacterStatsMessage(bool sitting, ushort level, CharacterMinimalInformations infos, IEnumerable<uint> spells)"
    ));
    assert!(code.contains("writer.WriteVarShort(level);"));
    assert!(code.contains("var flag = reader.ReadByte();"));
    assert!(code.contains("spells_[spellsIndex] = reader.ReadVarUInt();"));
    assert!(!code.contains("using Types."));
    assert!(!code.contains("throw"));

    let type_code = generate_protocol_class(&classes[1], Family::Type, &ctx);
    assert!(type_code.contains("public const short Id = 110;"));
    assert!(type_code.contains("public ulong objectId { get; set; }"));
    assert!(type_code.contains("public virtual void Serialize(IDataWriter writer)"));
}

#[test]
fn parsing_is_deterministic() {
    let config = GeneratorConfig::default();
    let first = parse_protocol_class(CHARACTER_STATS, &config).unwrap();
    let second = parse_protocol_class(CHARACTER_STATS, &config).unwrap();
    assert_eq!(first, second);
    assert!(first.variables.iter().all(|v| v.type_of_var != VarType::Object || v.name == "infos"));
}

#[test]
fn registry_files_are_optional() {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = GeneratorConfig::default();
    let dir = tempfile::tempdir().unwrap();

    let empty = IdRegistry::load(dir.path(), &config).unwrap();
    assert_eq!(empty.message_count(), 0);
    assert_eq!(empty.type_count(), 0);

    fs::write(
        dir.path().join(&config.registry.type_file),
        "_typesTypes[110] = CharacterMinimalInformations;\n_typesTypes[111] = CharacterMinimalInformations;\n",
    )
    .unwrap();
    let loaded = IdRegistry::load(dir.path(), &config).unwrap();
    assert_eq!(loaded.type_id("CharacterMinimalInformations"), Some(111));
    assert_eq!(loaded.message_count(), 0);
}
